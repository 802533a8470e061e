pub mod expense;
pub mod report;

pub use expense::ExpenseService;
pub use report::ReportService;
