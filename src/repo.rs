//! Row-oriented repository baseline: the same filtered sum computed through
//! trait-object dispatch and per-record visitor calls instead of flat-array
//! iteration.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct User {
    pub id: i32,
    pub balance: f32,
    pub active: bool,
}

pub trait UserRepository {
    /// Visits every record once, in storage order, no filtering.
    fn for_each(&self, visitor: &mut dyn FnMut(&User));

    /// First record with the given id, by linear scan.
    fn find_by_id(&self, id: i32) -> Option<User>;
}

/// Owning contiguous-record store.
#[derive(Debug, Clone)]
pub struct VecUserRepository {
    users: Vec<User>,
}

impl VecUserRepository {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserRepository for VecUserRepository {
    fn for_each(&self, visitor: &mut dyn FnMut(&User)) {
        for user in &self.users {
            visitor(user);
        }
    }

    fn find_by_id(&self, id: i32) -> Option<User> {
        self.users.iter().find(|user| user.id == id).copied()
    }
}

fn qualifies(user: &User, minimum_balance: f32) -> bool {
    user.active && user.balance >= minimum_balance
}

/// Filtered sum over the repository, f32 accumulation in visit order.
pub fn sum_active_balances(repository: &dyn UserRepository, minimum_balance: f32) -> f32 {
    let mut accumulated = 0.0f32;
    repository.for_each(&mut |user| {
        if qualifies(user, minimum_balance) {
            accumulated += user.balance;
        }
    });
    accumulated
}
