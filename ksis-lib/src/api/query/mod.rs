//! List queries.
//!
//! Everything a list view needs to describe and page through a filtered
//! set of rows.
//!
//! - [`QueryDescriptor`] - value describing one list request
//! - [`ListQueryController`] - owns a descriptor and its reset rules
//! - [`SearchCategory`] - one entry of a board's category set
//! - [`Pagination`] - page buttons and clamping
//! - [`ResultPage`] - one fetched page of rows

mod category;
mod controller;
mod descriptor;
mod page;
mod pagination;

pub use category::SearchCategory;
pub use controller::ListQueryController;
pub use descriptor::DateRange;
pub use descriptor::ParamNames;
pub use descriptor::QueryDescriptor;
pub(crate) use page::PageBody;
pub use page::ResultPage;
pub use pagination::Pagination;
