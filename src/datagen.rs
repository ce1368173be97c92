//! Seeded test-data generation. Output depends only on the seed and the
//! per-element draw order (balance first, then activity), so the column and
//! row forms of the same configuration describe the same users.

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::repo::User;
use crate::view::UsersView;

#[derive(Debug, Clone)]
pub struct GenConfig {
    pub count: usize,
    pub seed: u64,
    /// Balances are drawn uniformly from `[balance_min, balance_max)`.
    pub balance_min: f32,
    pub balance_max: f32,
    pub active_probability: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            count: 10_000_000,
            seed: 17,
            balance_min: 0.0,
            balance_max: 1000.0,
            active_probability: 0.6,
        }
    }
}

/// Owned structure-of-arrays user columns.
#[derive(Debug, Clone)]
pub struct UserColumns {
    pub ids: Vec<i32>,
    pub balances: Vec<f32>,
    pub active: Vec<u8>,
}

impl UserColumns {
    pub fn view(&self) -> UsersView<'_> {
        UsersView::new(&self.ids, &self.balances, &self.active)
    }
}

pub fn generate_columns(config: &GenConfig) -> UserColumns {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let balance_dist = Uniform::new(config.balance_min, config.balance_max);
    let active_probability = config.active_probability.clamp(0.0, 1.0);

    let mut ids = Vec::with_capacity(config.count);
    let mut balances = Vec::with_capacity(config.count);
    let mut active = Vec::with_capacity(config.count);

    for i in 0..config.count {
        ids.push(i as i32);
        balances.push(balance_dist.sample(&mut rng));
        active.push(u8::from(rng.gen_bool(active_probability)));
    }

    UserColumns {
        ids,
        balances,
        active,
    }
}

/// Row form for the repository path.
pub fn generate_users(config: &GenConfig) -> Vec<User> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let balance_dist = Uniform::new(config.balance_min, config.balance_max);
    let active_probability = config.active_probability.clamp(0.0, 1.0);

    let mut users = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let balance = balance_dist.sample(&mut rng);
        let active = rng.gen_bool(active_probability);
        users.push(User {
            id: i as i32,
            balance,
            active,
        });
    }
    users
}
