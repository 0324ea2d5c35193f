pub mod chat_loop;
pub mod layout;
pub mod modal;
pub mod notice;
pub mod renderer;
pub mod theme;
