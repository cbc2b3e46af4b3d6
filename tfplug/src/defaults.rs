//! Values planned for optional attributes left out of the configuration
//!
//! A default only applies to attributes that are both optional and
//! computed; plan modifiers then run over the defaulted value.

use crate::types::Dynamic;

pub trait AttributeDefault: Send + Sync {
    fn value(&self) -> Dynamic;
}

/// The same value every time
pub struct StaticDefault(Dynamic);

impl StaticDefault {
    pub fn new(value: Dynamic) -> Self {
        Self(value)
    }

    pub fn string(value: &str) -> Self {
        Self(Dynamic::String(value.to_string()))
    }
}

impl AttributeDefault for StaticDefault {
    fn value(&self) -> Dynamic {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_default_repeats_its_value() {
        let tags = StaticDefault::string("{}");
        assert_eq!(tags.value(), Dynamic::String("{}".to_string()));
        assert_eq!(tags.value(), tags.value());

        let limit = StaticDefault::new(Dynamic::Number(100.0));
        assert_eq!(limit.value().as_number(), Some(100.0));
    }
}
