pub mod onboarding;
pub mod tracking;
