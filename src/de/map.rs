use serde::de;

use crate::de::{Cause, Deserializer, Error, Result};

pub(crate) struct MapAccess<'a, 'b> {
    de: &'a mut Deserializer<'b>,
    first: bool,
}

impl<'a, 'b> MapAccess<'a, 'b> {
    pub fn new(de: &'a mut Deserializer<'b>) -> Self {
        MapAccess { de, first: true }
    }
}

impl<'a, 'de> de::MapAccess<'de> for MapAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let peek = match self.de.parse_whitespace() {
            Some(b'}') => return Ok(None),
            Some(b',') if !self.first => {
                self.de.eat_char();
                self.de.parse_whitespace()
            }
            Some(c) => {
                if self.first {
                    self.first = false;
                    Some(c)
                } else {
                    return Err(self.de.error(Cause::ExpectedObjectCommaOrEnd));
                }
            }
            None => return Err(self.de.error(Cause::EofWhileParsingObject)),
        };

        match peek {
            Some(b'"') => seed.deserialize(&mut *self.de).map(Some),
            Some(b'}') => Err(self.de.error(Cause::TrailingComma)),
            Some(_) => Err(self.de.error(Cause::KeyMustBeAString)),
            None => Err(self.de.error(Cause::EofWhileParsingValue)),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        self.de.parse_object_colon()?;

        seed.deserialize(&mut *self.de)
    }
}
