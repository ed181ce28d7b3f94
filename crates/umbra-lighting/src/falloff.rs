/// Light falloff by (|dy|, |dx|) from a source, both capped at 7.
///
/// Roughly `max + min/2`, saturating at 7.
#[rustfmt::skip]
pub const FALLOFF: [[u8; 8]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7],
    [1, 1, 2, 3, 4, 5, 6, 7],
    [2, 2, 3, 4, 5, 6, 7, 7],
    [3, 3, 4, 4, 5, 6, 7, 7],
    [4, 4, 5, 5, 6, 7, 7, 7],
    [5, 5, 6, 6, 7, 7, 7, 7],
    [6, 6, 7, 7, 7, 7, 7, 7],
    [7, 7, 7, 7, 7, 7, 7, 7],
];

#[inline]
pub fn falloff(dx: i32, dy: i32) -> i32 {
    let ax = dx.unsigned_abs().min(7) as usize;
    let ay = dy.unsigned_abs().min(7) as usize;
    FALLOFF[ay][ax] as i32
}
