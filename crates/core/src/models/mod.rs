pub mod apartment;
pub mod block;
pub mod category;
pub mod contractor;
pub mod notification;
pub mod project;
pub mod reception;
pub mod reserve;
pub mod settings;
pub mod task;

pub use apartment::{Apartment, CreateApartment, UpdateApartment};
pub use block::{Block, CreateBlock, UpdateBlock};
pub use category::{Category, CreateCategory, UpdateCategory};
pub use contractor::{Contractor, CreateContractor, UpdateContractor};
pub use notification::{
    NewNotification, Notification, NotificationKind, NotificationSettings,
    UpdateNotificationSettings,
};
pub use project::{CreateProject, Project, UpdateProject};
pub use reception::{CreateReception, Reception, UpdateReception};
pub use reserve::{CreateReserve, Reserve, UpdateReserve};
pub use settings::{Language, Settings, Theme, UpdateSettings};
pub use task::{CreateTask, Task, UpdateTask};
