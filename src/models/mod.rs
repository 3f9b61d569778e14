//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod club;
pub mod event;
pub mod registration;
pub mod user;

// Re-export commonly used models
pub use club::{Club, ClubSummary, ClubMember};
pub use event::{
    Event, EventView, CreateEventRequest, UpdateEventRequest, EventFilter,
};
pub use registration::{
    Registration, RegistrationStatus, RegistrationWithEvent, EventAttendee,
};
pub use user::{
    User, UserRole, UserProfile, CreateUserRequest, UpdateProfileRequest,
};
