mod li_fire;

pub use li_fire::{LiFire, LiFireParameters};
