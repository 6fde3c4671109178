pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Session};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod report_service;
pub use report_service::{Report, ReportDraft, ReportError, ReportService};

pub mod report_service_impl;
pub use report_service_impl::SeaOrmReportService;

pub mod user_service;
pub use user_service::{Account, AccountPatch, UserError, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;
