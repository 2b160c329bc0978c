//! Record stores over a SeaORM connection.
//!
//! Each store borrows anything implementing [`sea_orm::ConnectionTrait`], so
//! the same code runs against the pool or inside a transaction.

mod claims;
mod documents;
mod pattas;
mod socio;

pub use claims::{ClaimStore, NewClaim};
pub use documents::{DocumentStore, NewDocument};
pub use pattas::{NewPatta, PattaStore};
pub use socio::{NewSocioEconomic, SocioEconomicStore};

use sea_orm::sea_query::{Expr, SimpleExpr};

/// SQLite scan order, i.e. insertion order
fn insertion_order(table: &str) -> SimpleExpr {
    Expr::cust(format!("\"{}\".rowid", table))
}
