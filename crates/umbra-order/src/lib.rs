//! Legacy draw order over overlay objects.
//!
//! Objects sort by the map position of their anchor: rows top to bottom,
//! then columns left to right, then higher z first. Objects that are not on
//! the map (contained, carried, worn) are redirected along their association
//! chain to the object that is.
#![forbid(unsafe_code)]

use std::cmp::Ordering;

use umbra_world::{CoordUse, ObjectLookup, RenderableObject};

/// Upper bound on containment hops followed while resolving an anchor.
pub const MAX_ASSOC_HOPS: usize = 32;

#[inline]
fn resolve_assoc<'a, L>(lookup: &'a L, obj: &'a RenderableObject) -> &'a RenderableObject
where
    L: ObjectLookup + ?Sized,
{
    obj.assoc.and_then(|id| lookup.object(id)).unwrap_or(obj)
}

/// Follows `Contained` objects to the first holder that is not contained.
pub fn resolve_contained_anchor<'a, L>(lookup: &'a L, obj: &'a RenderableObject) -> &'a RenderableObject
where
    L: ObjectLookup + ?Sized,
{
    let mut cur = obj;
    for _ in 0..MAX_ASSOC_HOPS {
        if cur.status.coord_use() != CoordUse::Contained {
            break;
        }
        let next = resolve_assoc(lookup, cur);
        if next.id == cur.id {
            break;
        }
        cur = next;
    }
    cur
}

/// Primary position key on raw coordinates: y, then x, then z descending.
#[inline]
pub fn compare_position(a: &RenderableObject, b: &RenderableObject) -> Ordering {
    a.y.cmp(&b.y)
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| b.z.cmp(&a.z))
}

/// Strict legacy comparison.
///
/// Returns `Equal` for two distinct objects whose anchors share a position,
/// and for two objects hanging off the same anchor with the same coordinate
/// use. When one of the two is the map-placed anchor itself, it sorts after
/// the object it holds.
pub fn compare_legacy_object_order_strict<L>(
    lookup: &L,
    a: &RenderableObject,
    b: &RenderableObject,
) -> Ordering
where
    L: ObjectLookup + ?Sized,
{
    let mut anchor_a = resolve_contained_anchor(lookup, a);
    let mut anchor_b = resolve_contained_anchor(lookup, b);

    if !anchor_a.is_on_map() && b.is_on_map() {
        return Ordering::Less;
    }
    if !anchor_b.is_on_map() && a.is_on_map() {
        return Ordering::Greater;
    }
    if anchor_a.status.needs_anchor_hop() {
        anchor_a = resolve_assoc(lookup, anchor_a);
    }
    if anchor_b.status.needs_anchor_hop() {
        anchor_b = resolve_assoc(lookup, anchor_b);
    }

    if anchor_a.id == anchor_b.id {
        return match (a.is_on_map(), b.is_on_map()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        };
    }
    compare_position(anchor_a, anchor_b)
}

/// Strict comparison with deterministic tie breaks on source area, stream
/// index, then order. Never overrides a non-`Equal` strict result.
pub fn compare_legacy_object_order_stable<L>(
    lookup: &L,
    a: &RenderableObject,
    b: &RenderableObject,
) -> Ordering
where
    L: ObjectLookup + ?Sized,
{
    compare_legacy_object_order_strict(lookup, a, b)
        .then_with(|| a.source_area.cmp(&b.source_area))
        .then_with(|| a.stream_index().cmp(&b.stream_index()))
        .then_with(|| a.order.cmp(&b.order))
}

/// Sorts a list of objects into stable legacy order.
pub fn sort_legacy<L>(lookup: &L, objects: &mut [&RenderableObject])
where
    L: ObjectLookup + ?Sized,
{
    objects.sort_by(|a, b| compare_legacy_object_order_stable(lookup, a, b));
}

#[cfg(test)]
mod tests;
