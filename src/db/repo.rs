mod account;
mod account_db;
mod account_mem;

pub use account::AccountRepo;
pub use account_db::AccountRepository;
pub use account_mem::MemoryAccountRepository;
