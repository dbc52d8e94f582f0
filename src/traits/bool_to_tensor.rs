use burn::{
    prelude::*,
    tensor::{backend::Backend, TensorData},
};

pub trait BoolToTensor<B: Backend> {
    fn to_bool_tensor(self, device: &B::Device) -> Tensor<B, 1, Bool>;

    /// `1 - terminal` as floats: 1.0 where the episode goes on, 0.0 where it ended
    fn to_not_done_mask(self, device: &B::Device) -> Tensor<B, 1>
    where
        Self: Sized,
    {
        self.to_bool_tensor(device).bool_not().float()
    }
}

impl<B: Backend> BoolToTensor<B> for &[bool] {
    fn to_bool_tensor(self, device: &B::Device) -> Tensor<B, 1, Bool> {
        Tensor::from_data(TensorData::new(self.to_vec(), [self.len()]), device)
    }
}
