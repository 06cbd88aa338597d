pub mod chat;
pub mod dashboard;
pub mod marketing;
pub mod modals;
pub mod onboarding;
pub mod shared;
pub mod sme;
pub mod vault;

pub use chat::ChatWindow;
pub use dashboard::DashboardView;
pub use marketing::MarketingSite;
pub use modals::{ChangeSmeModal, EditProfileModal, ManageCategoriesModal};
pub use onboarding::UserIdentity;
pub use sme::SmeSelector;
pub use vault::VaultView;
