pub mod checklist;
pub mod items;
pub mod recent;
