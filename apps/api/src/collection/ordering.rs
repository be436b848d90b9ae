use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Puts entries in display order.
///
/// Without a seed the stored order is kept. With a seed the entries are shuffled
/// deterministically, so a preview and a PDF requested with the same seed agree.
pub fn arrange(mut entries: Vec<String>, shuffle_seed: Option<u64>) -> Vec<String> {
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        entries.shuffle(&mut rng);
    }
    entries
}
