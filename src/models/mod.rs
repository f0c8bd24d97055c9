pub mod common;
pub mod contact;
pub mod event;
pub mod lead;
pub mod preference;
pub mod purchase;
pub mod quota;
pub mod referral;
pub mod stats;
pub mod subscription;
