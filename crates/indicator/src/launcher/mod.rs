/// 终端启动模块

pub mod terminal;

pub use terminal::Launcher;
