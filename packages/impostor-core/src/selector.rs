use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 除外制約付きのリジェクションサンプリングで諦めるまでの試行回数
pub const MAX_EXCLUSION_ATTEMPTS: usize = 200;

/// Uniform random choices over index sets. All randomness of the engine goes
/// through this type so that tests can inject a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomSelector<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// 親の乱数列から独立したセレクタを派生させる（別タスクへ渡す用途）
    pub fn split(&mut self) -> RandomSelector<StdRng> {
        RandomSelector::seeded(self.rng.gen())
    }

    /// `[0, len)` から一様に1つ選ぶ。`len == 0` のときは `None`。
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).map(|i| &items[i])
    }

    /// Returns `count` distinct indices drawn uniformly from `[0, n)`.
    ///
    /// `exclude` is soft: draws landing in it are rejected for up to
    /// [`MAX_EXCLUSION_ATTEMPTS`] attempts. Once the bound is spent the
    /// remaining slots are filled from the unused indices, non-excluded ones
    /// first, so the result always has exactly `count` elements.
    pub fn choose_distinct(
        &mut self,
        n: usize,
        count: usize,
        exclude: &BTreeSet<usize>,
    ) -> BTreeSet<usize> {
        let count = if count > n {
            tracing::warn!("requested {} distinct indices out of {}, clamping", count, n);
            n
        } else {
            count
        };

        let mut chosen = BTreeSet::new();
        let mut attempts = 0;
        while chosen.len() < count && attempts < MAX_EXCLUSION_ATTEMPTS {
            attempts += 1;
            let candidate = self.rng.gen_range(0..n);
            if chosen.contains(&candidate) || exclude.contains(&candidate) {
                continue;
            }
            chosen.insert(candidate);
        }

        if chosen.len() < count {
            tracing::debug!(
                "exclusion not satisfied after {} attempts ({} of {} picked), relaxing",
                attempts,
                chosen.len(),
                count
            );
            self.fill_remaining(n, count, exclude, &mut chosen);
        }

        chosen
    }

    // 残りの枠を未使用インデックスから埋める。除外対象は最後に回す。
    fn fill_remaining(
        &mut self,
        n: usize,
        count: usize,
        exclude: &BTreeSet<usize>,
        chosen: &mut BTreeSet<usize>,
    ) {
        let (mut preferred, mut excluded): (Vec<usize>, Vec<usize>) = (0..n)
            .filter(|i| !chosen.contains(i))
            .partition(|i| !exclude.contains(i));
        preferred.shuffle(&mut self.rng);
        excluded.shuffle(&mut self.rng);

        for index in preferred.into_iter().chain(excluded) {
            if chosen.len() == count {
                break;
            }
            chosen.insert(index);
        }
    }
}
