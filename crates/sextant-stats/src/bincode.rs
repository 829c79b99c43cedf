use crate::Distribution;
use nalgebra::{SMatrix, SVector};

// Layout: the sample count, then the mean and the row-major covariance.
// Only the count is stored for an empty distribution.

impl<const D: usize> bincode::enc::Encode for Distribution<D> {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&(self.n() as u64), encoder)?;
        if self.is_empty() {
            return Ok(());
        }
        for value in self.mean().iter() {
            bincode::Encode::encode(value, encoder)?;
        }
        let covariance = self.covariance();
        for row in 0..D {
            for col in 0..D {
                bincode::Encode::encode(&covariance[(row, col)], encoder)?;
            }
        }
        Ok(())
    }
}

impl<const D: usize, C> bincode::de::Decode<C> for Distribution<D> {
    fn decode<De: bincode::de::Decoder<Context = C>>(
        decoder: &mut De,
    ) -> Result<Self, bincode::error::DecodeError> {
        let n: u64 = bincode::Decode::decode(decoder)?;
        if n == 0 {
            return Ok(Self::new());
        }
        let n = usize::try_from(n).map_err(|_| {
            bincode::error::DecodeError::OtherString(format!("sample count {n} out of range"))
        })?;

        let mut mean = SVector::<f64, D>::zeros();
        for value in mean.iter_mut() {
            *value = bincode::Decode::decode(decoder)?;
        }
        let mut covariance = SMatrix::<f64, D, D>::zeros();
        for row in 0..D {
            for col in 0..D {
                covariance[(row, col)] = bincode::Decode::decode(decoder)?;
            }
        }
        Ok(Self::from_parts(n, mean, covariance))
    }
}
