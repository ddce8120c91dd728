pub mod bill;
pub mod memory;
pub mod revocation;
pub mod unit_of_work;
pub mod user;

pub use bill::{BillItemRepository, BillRepository};
pub use memory::{
    InMemoryBillStore, InMemoryRevocationStore, InMemoryUnitOfWork, InMemoryUserRepository,
    NoopRevocationStore,
};
pub use revocation::RevocationStore;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory, UnitOfWorkState};
pub use user::UserRepository;
