use crate::Distribution;
use nalgebra::{SMatrix, SVector};
use serde::ser::SerializeSeq;
use serde::Deserialize;

// Flattened as `[n, mean.., covariance (row-major)..]`.

impl<const D: usize> serde::Serialize for Distribution<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(1 + D + D * D))?;
        seq.serialize_element(&(self.n() as f64))?;
        for value in self.mean().iter() {
            seq.serialize_element(value)?;
        }
        let covariance = self.covariance();
        for row in 0..D {
            for col in 0..D {
                seq.serialize_element(&covariance[(row, col)])?;
            }
        }
        seq.end()
    }
}

impl<'de, const D: usize> serde::Deserialize<'de> for Distribution<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: serde::Deserializer<'de>,
    {
        let data = Vec::<f64>::deserialize(deserializer)?;
        if data.len() != 1 + D + D * D {
            return Err(serde::de::Error::invalid_length(
                data.len(),
                &format!("a sequence of {} values", 1 + D + D * D).as_str(),
            ));
        }

        let n = data[0];
        if !(n >= 0.0 && n.fract() == 0.0) {
            return Err(serde::de::Error::custom(format!("invalid sample count {n}")));
        }
        let mean = SVector::<f64, D>::from_column_slice(&data[1..1 + D]);
        let covariance = SMatrix::<f64, D, D>::from_row_slice(&data[1 + D..]);
        Ok(Self::from_parts(n as usize, mean, covariance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn test_serde() -> Result<(), Box<dyn std::error::Error>> {
        let dist = [
            Vector2::new(0.5, 1.0),
            Vector2::new(1.5, -1.0),
            Vector2::new(-0.25, 0.0),
        ]
        .into_iter()
        .collect::<Distribution<2>>();

        let serialized = serde_json::to_string(&dist)?;
        let values: Vec<f64> = serde_json::from_str(&serialized)?;
        assert_eq!(values.len(), 7);
        assert_eq!(values[0], 3.0);

        let deserialized: Distribution<2> = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized.n(), 3);
        assert_relative_eq!(deserialized.mean(), dist.mean(), epsilon = 1e-12);
        assert_relative_eq!(deserialized.covariance(), dist.covariance(), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_serde_wrong_length() {
        let result = serde_json::from_str::<Distribution<2>>("[3.0, 1.0, 2.0]");
        assert!(result.is_err());
        let result = serde_json::from_str::<Distribution<2>>("[-1.0, 0, 0, 0, 0, 0, 0]");
        assert!(result.is_err());
    }
}
