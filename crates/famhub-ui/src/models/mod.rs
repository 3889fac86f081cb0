//! Page models. Each page owns its rows and a `ViewScope`; a renderer reads
//! the accessors and forwards user actions to the async methods.

pub mod board;
pub mod cards;
pub mod company_benefits;
pub mod edit_state;
pub mod home;
pub mod new_post;
pub mod post_detail;
pub mod schedule;
pub mod scope;

mod outcome;

pub use board::{BoardModel, BoardRow};
pub use cards::{CardForm, CardLookupModel, CardManagerModel, LookupRow};
pub use company_benefits::{CompanyManagerModel, CompanyTableModel, EMPTY_CELL};
pub use edit_state::{EditState, EditStates};
pub use home::HomeModel;
pub use new_post::{NewPostModel, Submitted, UploadFile, UploadReport};
pub use post_detail::{CommentRow, PostDetailModel, PostDraft};
pub use schedule::{CalendarCell, ScheduleDraft, ScheduleForm, ScheduleModel};
pub use scope::ViewScope;
