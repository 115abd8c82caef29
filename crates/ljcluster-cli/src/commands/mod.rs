pub mod radii;
pub mod run;
