
use crate::integration::methods::ServiceMethods;
use crate::plugin_system::traits::{Ordered, Plugin};
use serde_json::{Value, json};

/// Translates a word for the languages it supports
pub trait Translator: Plugin<str> {
    fn translate(&self, word: &str) -> String;
}

pub struct Suffixing {
    pub language: &'static str,
    pub suffix: &'static str,
    pub order: i32,
}

impl Ordered for Suffixing {
    fn order(&self) -> i32 {
        self.order
    }
}

impl Plugin<str> for Suffixing {
    fn supports(&self, delimiter: &str) -> bool {
        delimiter == self.language
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

impl Translator for Suffixing {
    fn translate(&self, word: &str) -> String {
        format!("{}{}", word, self.suffix)
    }
}

pub fn translator_methods() -> ServiceMethods<dyn Translator> {
    ServiceMethods::<dyn Translator>::new()
        .method("translate", |translator, message| {
            let word = message.payload.get("word").and_then(Value::as_str).unwrap_or_default();
            Some(json!(translator.translate(word)))
        })
        .method("log", |_, _| None)
}
