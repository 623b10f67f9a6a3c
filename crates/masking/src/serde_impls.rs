//! Serde-related.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Secret, Strategy};

impl<'de, SecretValue, MaskingStrategy> Deserialize<'de> for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Deserialize<'de>,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        SecretValue::deserialize(deserializer).map(Self::new)
    }
}

impl<SecretValue, MaskingStrategy> Serialize for Secret<SecretValue, MaskingStrategy>
where
    SecretValue: Serialize,
    MaskingStrategy: Strategy<SecretValue>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner_secret.serialize(serializer)
    }
}
