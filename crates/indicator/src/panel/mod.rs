/// 面板显示模块

pub mod label;
pub mod tooltip;

pub use label::{render_cells, render_line, PanelCell};
pub use tooltip::render_detailed;
