pub use crate::fields::{
    ButtonChooser, FieldBinding, FieldOption, FieldProps, Mask, MaskedInput, OptionList,
    RadioGroup,
};
pub use crate::form::validators;
pub use crate::form::{
    AgnosticErrors, FieldPath, FieldValidatorFn, FormError, FormMap, FormOptions, FormProvider,
    FormResult, FormValue, FormValues, ReactiveStore, field_validator,
};
pub use crate::id::FieldElementId;
