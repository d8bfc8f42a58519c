#![forbid(unsafe_code)]

pub mod composite;
pub mod enumerate;
pub mod error;
pub mod layer;
pub mod layout;
pub mod mainbird;
pub mod naming;

pub use composite::{alpha_composite, over};
pub use enumerate::{
    ComboSink, Composite, GenerateReport, LayerStack, PlanOnly, PlannedCombo, PngDirSink,
    count_combinations, generate, plan, walk,
};
pub use error::{PfpError, PfpResult};
pub use layer::{Base, combine_list, compose, open_rgba, save_png};
pub use layout::{Category, DEFAULT_BASE, DEFAULT_OUT, Layout};
pub use mainbird::make_main_bird;
pub use naming::{Choice, combo_name, variant_token};
