mod binding;
mod choice;
mod mask;
mod options;

#[cfg(test)]
mod tests;

pub use binding::{FieldBinding, FieldProps};
pub use choice::{ButtonChooser, ChangeHandler, RadioGroup};
pub use mask::{Mask, MaskToken, MaskedInput};
pub use options::{FieldOption, OptionList, OptionListBuilder};
