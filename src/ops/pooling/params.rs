/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 三维池化参数：由有序的整数参数列表解析而来，每次调用现建现用
 *
 * 整数参数顺序：
 * 0,1,2    - 核大小 kD, kH, kW
 * 3,4,5    - 步长 sD, sH, sW
 * 6,7,8    - 补零 pD, pH, pW（SAME模式下会被重新计算）
 * 9,10,11  - 膨胀 dD, dH, dW
 * 12       - 1: SAME, 0: VALID
 * 13       - 附加参数，最大池化不用；平均池化中 0: 不计补零, 1: 计入补零
 * 14（可选）- 0: NCDHW（缺省）, 非0: NDHWC
 */

use crate::errors::{ArgumentKind, OpError};
use crate::require;
use serde::{Deserialize, Serialize};

/// 5阶张量的轴布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataFormat {
    /// 通道在前：[batch, C, D, H, W]
    #[default]
    Ncdhw,
    /// 通道在后：[batch, D, H, W, C]
    Ndhwc,
}

impl DataFormat {
    pub const fn channel_axis(self) -> usize {
        match self {
            Self::Ncdhw => 1,
            Self::Ndhwc => 4,
        }
    }

    /// 深度轴的位置，高、宽轴依次紧随其后
    pub const fn depth_axis(self) -> usize {
        match self {
            Self::Ncdhw => 2,
            Self::Ndhwc => 1,
        }
    }

    /// 把该布局的张量看成NCDHW所需的轴置换
    pub const fn to_ncdhw_axes(self) -> [usize; 5] {
        match self {
            Self::Ncdhw => [0, 1, 2, 3, 4],
            Self::Ndhwc => [0, 4, 1, 2, 3],
        }
    }

    /// 按本布局把(batch, 通道, 空间三维)拼成5阶形状
    pub fn compose_shape(self, batch: usize, channels: usize, spatial: [usize; 3]) -> [usize; 5] {
        let mut shape = [0; 5];
        shape[0] = batch;
        shape[self.channel_axis()] = channels;
        let depth_axis = self.depth_axis();
        shape[depth_axis..depth_axis + 3].copy_from_slice(&spatial);
        shape
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool3dParams {
    pub kernel: [usize; 3],
    pub stride: [usize; 3],
    pub padding: [usize; 3],
    pub dilation: [usize; 3],
    pub same_mode: bool,
    pub extra_param0: i64,
    pub data_format: DataFormat,
}

impl Pool3dParams {
    /// 必需的整数参数个数（第15个可选参数决定布局）
    pub const NUM_I_ARGS: usize = 14;

    pub fn from_i_args(op_name: &str, args: &[i64]) -> Result<Self, OpError> {
        if args.len() < Self::NUM_I_ARGS {
            return Err(OpError::ArgumentCount {
                op_name: op_name.to_string(),
                kind: ArgumentKind::IntArg,
                expected: Self::NUM_I_ARGS,
                got: args.len(),
            });
        }

        // 膨胀为0属于配置错误，须在任何形状计算之前拒绝
        let (d_d, d_h, d_w) = (args[9], args[10], args[11]);
        require!(
            d_d != 0 && d_h != 0 && d_w != 0,
            op_name,
            "膨胀（dilation）不能为0，实际为{{{d_d}, {d_h}, {d_w}}}"
        );

        let kernel = Self::positive_triple(op_name, "核大小（kernel）", &args[0..3])?;
        let stride = Self::positive_triple(op_name, "步长（stride）", &args[3..6])?;
        let padding = Self::non_negative_triple(op_name, "补零（padding）", &args[6..9])?;
        let dilation = Self::positive_triple(op_name, "膨胀（dilation）", &args[9..12])?;

        let data_format = match args.get(Self::NUM_I_ARGS) {
            None | Some(0) => DataFormat::Ncdhw,
            Some(_) => DataFormat::Ndhwc,
        };

        Ok(Self {
            kernel,
            stride,
            padding,
            dilation,
            same_mode: args[12] != 0,
            extra_param0: args[13],
            data_format,
        })
    }

    /// 反向转换为整数参数列表（总是带上第15个布局参数）
    pub fn to_i_args(&self) -> Vec<i64> {
        let mut args: Vec<i64> = [self.kernel, self.stride, self.padding, self.dilation]
            .iter()
            .flatten()
            .map(|&v| v as i64)
            .collect();
        args.push(i64::from(self.same_mode));
        args.push(self.extra_param0);
        args.push(match self.data_format {
            DataFormat::Ncdhw => 0,
            DataFormat::Ndhwc => 1,
        });
        args
    }

    fn positive_triple(op_name: &str, what: &str, values: &[i64]) -> Result<[usize; 3], OpError> {
        require!(
            values.iter().all(|&v| v > 0),
            op_name,
            "{what}须全部为正数，实际为{values:?}"
        );
        Ok([values[0] as usize, values[1] as usize, values[2] as usize])
    }

    fn non_negative_triple(
        op_name: &str,
        what: &str,
        values: &[i64],
    ) -> Result<[usize; 3], OpError> {
        require!(
            values.iter().all(|&v| v >= 0),
            op_name,
            "{what}不能为负数，实际为{values:?}"
        );
        Ok([values[0] as usize, values[1] as usize, values[2] as usize])
    }
}
