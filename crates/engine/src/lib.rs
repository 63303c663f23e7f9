//! Pure expense-splitting core.
//!
//! Two computations live here and share only the distribution entry shape:
//!
//! - [`compute_split`] builds the distribution of a new or edited expense;
//! - [`compute_balances`] nets recorded expenses into "owes you" / "you owe"
//!   statements for one viewer.
//!
//! Everything is synchronous and stateless: the viewer and the group are
//! always passed in, never read from ambient state.

pub use balances::{
    ALL_SETTLED, BalanceStatement, Direction, Settlement, compute_balances, net_balances,
};
pub use draft::{DEFAULT_CATEGORY, ExpenseDraft, ExpenseSubmission, ValidExpense};
pub use error::{EngineError, MissingField, MissingFields};
pub use expenses::{DistributionEntry, Expense};
pub use groups::{Group, Member, NameLookup};
pub use money::MoneyCents;
pub use receipt::{ReceiptExtraction, ReceiptImage};
pub use split::compute_split;
pub use statistics::{CategoryShare, DateRange, category_breakdown};

mod balances;
mod draft;
mod error;
mod expenses;
mod groups;
mod money;
pub mod receipt;
mod split;
pub mod statistics;

pub type ResultEngine<T> = Result<T, EngineError>;
