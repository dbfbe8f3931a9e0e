pub mod chat_loop;
pub mod layout;
pub mod renderer;
