use serde::{Deserialize, Serialize};
use tarpc::context;

/// Pair of operands carried by every calculator request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub num_1: i64,
    pub num_2: i64,
}

impl Input {
    pub fn new(num_1: i64, num_2: i64) -> Self {
        Self { num_1, num_2 }
    }

    /// Sum of both operands, wrapping on overflow.
    pub fn sum(self) -> Output {
        Output::new(self.num_1.wrapping_add(self.num_2))
    }

    /// Product of both operands, wrapping on overflow.
    pub fn product(self) -> Output {
        Output::new(self.num_1.wrapping_mul(self.num_2))
    }
}

/// Single integer returned by every calculator method.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub result: i64,
}

impl Output {
    pub fn new(result: i64) -> Self {
        Self { result }
    }
}

/// Tarpc service exposing two unary arithmetic operations.
#[tarpc::service]
pub trait Calculator {
    /// Returns the sum of both operands.
    async fn calculate(input: Input) -> Output;
    /// Returns the product of both operands.
    async fn multiply(input: Input) -> Output;
}

/// Server-side implementation of the [`Calculator`] service.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorService;

impl Calculator for CalculatorService {
    async fn calculate(self, _: context::Context, input: Input) -> Output {
        input.sum()
    }

    async fn multiply(self, _: context::Context, input: Input) -> Output {
        input.product()
    }
}
