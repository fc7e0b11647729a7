pub mod mri;
pub mod volume;

pub use mri::{
    image_to_tensor, is_image_extension, preprocess_image, ChannelOrder, ImageSpec, ImageTensor,
    Normalization, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH,
};
pub use volume::{analyze_volume, compute_volume, threshold_mask, VolumeResult, TUMOR_THRESHOLD};
