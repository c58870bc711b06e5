use std::str::FromStr;

use gpui::SharedString;
use tracing::trace;

use super::binding::FieldBinding;
use crate::form::{FormResult, FormStore, ReactiveStore, SharedStore};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MaskToken {
    /// `9`
    Digit,
    /// `a`
    Letter,
    /// `*`
    Alphanumeric,
    Literal(char),
}

impl MaskToken {
    fn from_pattern_char(ch: char) -> Self {
        match ch {
            '9' => Self::Digit,
            'a' => Self::Letter,
            '*' => Self::Alphanumeric,
            other => Self::Literal(other),
        }
    }

    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Letter => ch.is_ascii_alphabetic(),
            Self::Alphanumeric => ch.is_ascii_alphanumeric() || ch == '_',
            Self::Literal(literal) => ch == literal,
        }
    }
}

/// An input mask such as `(999) 999-9999`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mask {
    tokens: Vec<MaskToken>,
}

impl Mask {
    pub fn parse(pattern: &str) -> Self {
        Self {
            tokens: pattern.chars().map(MaskToken::from_pattern_char).collect(),
        }
    }

    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Fits `raw` into the mask. Characters a slot does not accept are
    /// dropped, literals are inserted as soon as more input follows them, and
    /// input beyond the mask is cut off.
    pub fn apply(&self, raw: &str) -> String {
        let mut input = raw.chars().peekable();
        let mut masked = String::with_capacity(self.tokens.len());

        for token in &self.tokens {
            if input.peek().is_none() {
                break;
            }
            match *token {
                MaskToken::Literal(literal) => {
                    masked.push(literal);
                    if input.peek() == Some(&literal) {
                        input.next();
                    }
                }
                slot => loop {
                    match input.next() {
                        Some(ch) if slot.accepts(ch) => {
                            masked.push(ch);
                            break;
                        }
                        Some(_) => {}
                        None => return masked,
                    }
                },
            }
        }
        masked
    }

    /// Whether `text` fills every slot of the mask.
    pub fn is_complete(&self, text: &str) -> bool {
        text.chars().count() == self.tokens.len()
            && text
                .chars()
                .zip(&self.tokens)
                .all(|(ch, token)| token.accepts(ch))
    }
}

impl FromStr for Mask {
    type Err = std::convert::Infallible;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(pattern))
    }
}

/// A text field whose value always conforms to a [`Mask`].
pub struct MaskedInput<S = SharedStore<FormStore>>
where
    S: ReactiveStore<FormStore>,
{
    field: FieldBinding<S>,
    mask: Mask,
}

impl<S> MaskedInput<S>
where
    S: ReactiveStore<FormStore>,
{
    pub fn new(field: FieldBinding<S>, mask: Mask) -> Self {
        Self { field, mask }
    }

    pub fn field(&self) -> &FieldBinding<S> {
        &self.field
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Masks what the user typed and stores it. Input into a disabled field
    /// is ignored and yields `None`.
    pub fn input(&self, raw: &str) -> FormResult<Option<SharedString>> {
        if self.field.is_disabled() {
            trace!(field = self.field.name(), "ignored input into disabled field");
            return Ok(None);
        }
        let masked = SharedString::from(self.mask.apply(raw));
        self.field.change(masked.clone())?;
        Ok(Some(masked))
    }

    pub fn is_complete(&self) -> bool {
        self.field
            .value()
            .as_text()
            .is_some_and(|text| self.mask.is_complete(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_inserts_literals_and_drops_rejected_characters() {
        let phone = Mask::parse("(999) 999-9999");
        assert_eq!(phone.apply("5551234567"), "(555) 123-4567");
        assert_eq!(phone.apply("555x12"), "(555) 12");
        assert_eq!(phone.apply("(555) 1"), "(555) 1");
        assert_eq!(phone.apply(""), "");
        assert_eq!(phone.apply("555123456789"), "(555) 123-4567");
    }

    #[test]
    fn letter_and_alphanumeric_slots() {
        let plate = Mask::parse("aa-**");
        assert_eq!(plate.apply("AB1c"), "AB-1c");
        assert_eq!(plate.apply("1A2B"), "AB");
        assert!(plate.is_complete("AB-1c"));
        assert!(!plate.is_complete("AB-1"));
        assert!(!plate.is_complete("A1-1c"));
    }

    #[test]
    fn letter_slots_accept_ascii_only() {
        let mask = Mask::parse("a*");
        assert_eq!(mask.apply("éß"), "");
        assert_eq!(mask.apply("éxß_"), "x_");
        assert!(!mask.is_complete("éß"));
        assert!(mask.is_complete("Z9"));
        assert!(MaskToken::Alphanumeric.accepts('_'));
        assert!(!MaskToken::Letter.accepts('_'));
    }

    #[test]
    fn parse_maps_pattern_characters() {
        let mask: Mask = "9a*-".parse().expect("infallible");
        assert_eq!(
            mask.tokens(),
            &[
                MaskToken::Digit,
                MaskToken::Letter,
                MaskToken::Alphanumeric,
                MaskToken::Literal('-')
            ]
        );
    }
}
