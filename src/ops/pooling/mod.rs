//! # 三维（体积）池化
//!
//! 形状推断、前向归约与反向梯度回传，支持 NCDHW 与 NDHWC 两种布局、
//! SAME/VALID 补零以及膨胀。

mod avgpool3d;
mod executor;
mod maxpool3d;
mod params;
mod shape;

pub use self::avgpool3d::{AvgPool3d, AvgPool3dBp};
pub use self::executor::{PoolWindow, PoolingMode, pooling3d, pooling3d_bp};
pub use self::maxpool3d::{MaxPool3d, MaxPool3dBp};
pub use self::params::{DataFormat, Pool3dParams};
pub use self::shape::{
    Pool3dGeometry, calc_out_size_pool3d, calc_padding3d, effective_kernel,
    infer_pool3d_bp_shape, infer_pool3d_output_shape, resolve_geometry,
};

#[cfg(test)]
mod tests;
