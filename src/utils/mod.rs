pub mod html;
pub mod retry;
