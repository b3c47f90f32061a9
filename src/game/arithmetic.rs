//! Arithmetic engine for numbers rounds
//!
//! A player's turn works on a set of number tokens. Each operation consumes
//! two tokens and produces one, so after `k` operations on an `n`-token pool
//! exactly `n - k` tokens remain. Nothing but the pool and logged results can
//! ever appear in the set.
//!
//! Selection order is operand, operator, operand. The first operand can be
//! picked again freely until an operator is chosen; from then on both the
//! first operand and the operator are fixed until the operation is applied or
//! the selection is cleared.

use crate::error::{GameError, OperationFault, SelectionFault};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a number token. Never reused within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn all() -> &'static [Operator] {
        &[
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
        ]
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Map a typed key to an operator. Accepts the ASCII spellings too.
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' | 'x' | 'X' | '×' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Evaluate `a OP b` under the game's integer rules.
    pub fn evaluate(self, a: i64, b: i64) -> Result<i64, OperationFault> {
        match self {
            Operator::Add => a.checked_add(b).ok_or(OperationFault::Overflow),
            Operator::Subtract => a.checked_sub(b).ok_or(OperationFault::Overflow),
            Operator::Multiply => a.checked_mul(b).ok_or(OperationFault::Overflow),
            Operator::Divide => {
                if b == 0 {
                    return Err(OperationFault::DivisionByZero);
                }
                if a.checked_rem(b).ok_or(OperationFault::Overflow)? != 0 {
                    return Err(OperationFault::NonIntegerDivision {
                        dividend: a,
                        divisor: b,
                    });
                }
                a.checked_div(b).ok_or(OperationFault::Overflow)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberToken {
    pub id: TokenId,
    pub value: i64,
}

/// One applied operation, as shown in the turn's trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub left: i64,
    pub operator: Operator,
    pub right: i64,
    pub result: i64,
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.left, self.operator, self.right, self.result
        )
    }
}

/// Outcome of a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub value: i64,
    pub token: TokenId,
    pub record: OperationRecord,
    /// The result equals the target. Informational; the turn goes on.
    pub exact: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub first: Option<TokenId>,
    pub operator: Option<Operator>,
    pub second: Option<TokenId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.operator.is_none() && self.second.is_none()
    }
}

/// Working set, pending selection and trace for one player's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticEngine {
    pool: Vec<i64>,
    target: i64,
    tokens: Vec<NumberToken>,
    #[serde(default)]
    selection: Selection,
    #[serde(default)]
    log: Vec<OperationRecord>,
    #[serde(default)]
    next_id: u32,
}

impl ArithmeticEngine {
    pub fn new(pool: &[i64], target: i64) -> Self {
        let mut engine = Self {
            pool: Vec::new(),
            target,
            tokens: Vec::new(),
            selection: Selection::default(),
            log: Vec::new(),
            next_id: 0,
        };
        engine.reset(pool);
        engine
    }

    /// Start over from `pool`: one fresh token per value, no selection, empty log.
    pub fn reset(&mut self, pool: &[i64]) {
        self.pool = pool.to_vec();
        self.tokens = Vec::with_capacity(pool.len());
        for &value in pool {
            let id = self.fresh_id();
            self.tokens.push(NumberToken { id, value });
        }
        self.selection = Selection::default();
        self.log.clear();
    }

    /// Drop the selection, restore the original pool and clear the trace.
    pub fn reset_all(&mut self) {
        let pool = std::mem::take(&mut self.pool);
        self.reset(&pool);
    }

    /// Drop the selection only.
    pub fn clear(&mut self) {
        self.selection = Selection::default();
    }

    pub fn select_first(&mut self, token: TokenId) -> Result<(), SelectionFault> {
        if self.selection.operator.is_some() {
            return Err(SelectionFault::FirstOperandLocked);
        }
        self.value_of(token).ok_or(SelectionFault::Unavailable)?;
        self.selection.first = Some(token);
        Ok(())
    }

    pub fn select_operator(&mut self, operator: Operator) -> Result<(), SelectionFault> {
        if self.selection.first.is_none() {
            return Err(SelectionFault::OperatorBeforeOperand);
        }
        if self.selection.operator.is_some() {
            return Err(SelectionFault::OperatorAlreadyChosen);
        }
        self.selection.operator = Some(operator);
        Ok(())
    }

    pub fn select_second(&mut self, token: TokenId) -> Result<(), SelectionFault> {
        if self.selection.operator.is_none() {
            return Err(SelectionFault::SecondBeforeOperator);
        }
        self.value_of(token).ok_or(SelectionFault::Unavailable)?;
        if self.selection.first == Some(token) {
            return Err(SelectionFault::SameToken);
        }
        self.selection.second = Some(token);
        Ok(())
    }

    /// Apply the complete selection. A refused operation leaves the working
    /// set, trace and selection as they were.
    pub fn apply(&mut self) -> Result<Applied, GameError> {
        let (first, operator, second) = match self.selection {
            Selection {
                first: Some(first),
                operator: Some(operator),
                second: Some(second),
            } => (first, operator, second),
            _ => return Err(SelectionFault::Incomplete.into()),
        };
        self.execute(first, operator, second)
    }

    /// Operand, operator and operand in one step. Any pending selection is
    /// discarded first.
    pub fn perform(
        &mut self,
        first: TokenId,
        operator: Operator,
        second: TokenId,
    ) -> Result<Applied, GameError> {
        if first == second {
            return Err(SelectionFault::SameToken.into());
        }
        if self.value_of(first).is_none() || self.value_of(second).is_none() {
            return Err(SelectionFault::Unavailable.into());
        }
        self.clear();
        self.execute(first, operator, second)
    }

    fn execute(
        &mut self,
        first: TokenId,
        operator: Operator,
        second: TokenId,
    ) -> Result<Applied, GameError> {
        let left = self.value_of(first).ok_or(SelectionFault::Unavailable)?;
        let right = self.value_of(second).ok_or(SelectionFault::Unavailable)?;
        let value = operator.evaluate(left, right)?;

        self.tokens.retain(|t| t.id != first && t.id != second);
        let token = self.fresh_id();
        self.tokens.push(NumberToken { id: token, value });

        let record = OperationRecord {
            left,
            operator,
            right,
            result: value,
        };
        self.log.push(record);
        self.selection = Selection::default();

        Ok(Applied {
            value,
            token,
            record,
            exact: value == self.target,
        })
    }

    fn fresh_id(&mut self) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        id
    }

    fn value_of(&self, token: TokenId) -> Option<i64> {
        self.tokens.iter().find(|t| t.id == token).map(|t| t.value)
    }

    pub fn tokens(&self) -> &[NumberToken] {
        &self.tokens
    }

    /// Token by display position (0-based).
    pub fn token_at(&self, index: usize) -> Option<NumberToken> {
        self.tokens.get(index).copied()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn log(&self) -> &[OperationRecord] {
        &self.log
    }

    pub fn pool(&self) -> &[i64] {
        &self.pool
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Value of the most recent operation, None before the first one.
    pub fn final_result(&self) -> Option<i64> {
        self.log.last().map(|r| r.result)
    }

    /// Trace joined for summaries: "75 × 4 = 300 → 300 + 10 = 310".
    pub fn trace(&self) -> String {
        self.log
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}
