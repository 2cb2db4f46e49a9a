use rand::rngs::StdRng;
use rand::RngExt;

/// In-place Fisher-Yates shuffle. All shuffling in the desktop flows through
/// a session-owned [`StdRng`] so a fixed seed reproduces the exact layout.
pub fn shuffle<T>(items: &mut [T], rng: &mut StdRng) {
    for current in (1..items.len()).rev() {
        let picked = rng.random_range(0..=current);
        items.swap(current, picked);
    }
}
