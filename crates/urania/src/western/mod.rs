pub mod signs;

pub use signs::{
    decan_index, degree_in_sign, format_degree, sign_index, Element, Modality, ZodiacSign,
};
