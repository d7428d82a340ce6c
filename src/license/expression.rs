//! SPDX license expressions as boolean algebra values.
//!
//! Expressions are validated with the `spdx` crate in strict mode and then
//! held as a tagged union so that combination and simplification operate on
//! structure, never on strings.

use crate::error::{RecipeError, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Above this many distinct leaves equivalence falls back to comparing
/// simplified forms instead of enumerating every assignment.
const MAX_EQUIVALENCE_LEAVES: usize = 16;

/// Strict SPDX, except that GNU licenses may take the `+` suffix.
const PARSE_MODE: spdx::ParseMode = spdx::ParseMode {
    allow_postfix_plus_on_gpl: true,
    ..spdx::ParseMode::STRICT
};

/// A single SPDX license identifier, optionally with the `+` suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LicenseId {
    /// Canonical SPDX short identifier, or a `LicenseRef-` reference
    pub id: String,
    /// The `+` ("or any later version") operator was applied
    pub or_later: bool,
}

impl fmt::Display for LicenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, if self.or_later { "+" } else { "" })
    }
}

/// A license expression.
///
/// Variant order matters: the derived `Ord` sorts plain licenses before
/// exceptions and exceptions before compound groups, which gives simplified
/// expressions their canonical operand order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LicenseExpr {
    License(LicenseId),
    With(LicenseId, String),
    And(Vec<LicenseExpr>),
    Or(Vec<LicenseExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl LicenseExpr {
    /// Parse a strict SPDX license expression.
    ///
    /// Unknown identifiers, lower-case operators, missing operands and
    /// unbalanced parentheses all fail with `InvalidExpression`. The
    /// deprecated `GPL-2.0+` spelling is accepted; GNU identifiers are held
    /// as their root (`GPL-2.0`) with `or_later` set for `-or-later`.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = spdx::Expression::parse_mode(text, PARSE_MODE)
            .map_err(|e| RecipeError::invalid_expression(text, e.to_string()))?;

        // Nodes arrive in postfix order
        let mut stack: Vec<LicenseExpr> = Vec::new();
        for node in parsed.iter() {
            match node {
                spdx::expression::ExprNode::Req(req) => stack.push(Self::from_req(&req.req)),
                spdx::expression::ExprNode::Op(op) => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(RecipeError::invalid_expression(text, "operator without operands"));
                    };
                    let op = match op {
                        spdx::expression::Operator::And => Operator::And,
                        spdx::expression::Operator::Or => Operator::Or,
                    };
                    stack.push(join(op, left, right));
                }
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(RecipeError::invalid_expression(text, "dangling operands")),
        }
    }

    fn from_req(req: &spdx::LicenseReq) -> Self {
        let license = match &req.license {
            spdx::LicenseItem::Spdx { id, or_later } => LicenseId {
                id: id.name.to_string(),
                or_later: *or_later,
            },
            spdx::LicenseItem::Other { doc_ref, lic_ref } => LicenseId {
                id: match doc_ref {
                    Some(doc) => format!("DocumentRef-{doc}:LicenseRef-{lic_ref}"),
                    None => format!("LicenseRef-{lic_ref}"),
                },
                or_later: false,
            },
        };
        match req.exception {
            Some(exception) => Self::With(license, exception.name.to_string()),
            None => Self::License(license),
        }
    }

    /// The explicit "no licenses" value: an empty conjunction.
    pub fn none() -> Self {
        Self::And(Vec::new())
    }

    /// Whether this is the empty conjunction produced by combining nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::And(operands) if operands.is_empty())
    }

    /// Whether this is a single license, with or without an exception.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::License(_) | Self::With(..))
    }

    /// Distinct leaves (licenses and license-with-exception pairs).
    pub fn leaves(&self) -> BTreeSet<&LicenseExpr> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut BTreeSet<&'a LicenseExpr>) {
        match self {
            Self::License(_) | Self::With(..) => {
                leaves.insert(self);
            }
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.collect_leaves(leaves);
                }
            }
        }
    }

    /// Evaluate the expression given which leaves are acceptable.
    pub fn evaluate<F>(&self, accept: &F) -> bool
    where
        F: Fn(&LicenseExpr) -> bool,
    {
        match self {
            Self::License(_) | Self::With(..) => accept(self),
            Self::And(operands) => operands.iter().all(|o| o.evaluate(accept)),
            Self::Or(operands) => operands.iter().any(|o| o.evaluate(accept)),
        }
    }

    /// Whether both expressions admit exactly the same license choices.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        let leaves: Vec<&LicenseExpr> = self.leaves().union(&other.leaves()).copied().collect();
        if leaves.len() > MAX_EQUIVALENCE_LEAVES {
            return self.simplify() == other.simplify();
        }

        (0u32..1 << leaves.len()).all(|mask| {
            let accept = |leaf: &LicenseExpr| {
                leaves
                    .iter()
                    .position(|l| *l == leaf)
                    .is_some_and(|i| mask & (1 << i) != 0)
            };
            self.evaluate(&accept) == other.evaluate(&accept)
        })
    }

    /// Reduce to a minimal, logically equivalent form.
    ///
    /// Flattens nested groups of the same operator, removes duplicate
    /// operands, applies absorption and unwraps single-operand groups.
    /// Operands come out sorted, so equal inputs give equal outputs
    /// regardless of declaration order.
    #[must_use]
    pub fn simplify(&self) -> Self {
        let mut current = self.simplify_once();
        loop {
            let next = current.simplify_once();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn simplify_once(&self) -> Self {
        match self {
            Self::License(_) | Self::With(..) => self.clone(),
            Self::And(operands) => simplify_group(Operator::And, operands),
            Self::Or(operands) => simplify_group(Operator::Or, operands),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(operands) | Self::Or(operands) if operands.len() > 1 => {
                write!(f, "({self})")
            }
            _ => write!(f, "{self}"),
        }
    }
}

/// Conjoin every expression, dropping structural duplicates.
///
/// Combining nothing yields [`LicenseExpr::none`], which renders as an empty
/// license value rather than an error.
pub fn combine_and<I>(exprs: I) -> LicenseExpr
where
    I: IntoIterator<Item = LicenseExpr>,
{
    let unique: BTreeSet<LicenseExpr> = exprs.into_iter().collect();
    LicenseExpr::And(unique.into_iter().collect())
}

/// Apply a binary operator, merging operands that are groups of the same
/// operator.
fn join(op: Operator, left: LicenseExpr, right: LicenseExpr) -> LicenseExpr {
    let mut operands = Vec::new();
    for side in [left, right] {
        match (op, side) {
            (Operator::And, LicenseExpr::And(inner)) | (Operator::Or, LicenseExpr::Or(inner)) => {
                operands.extend(inner);
            }
            (_, other) => operands.push(other),
        }
    }
    match op {
        Operator::And => LicenseExpr::And(operands),
        Operator::Or => LicenseExpr::Or(operands),
    }
}

fn simplify_group(op: Operator, operands: &[LicenseExpr]) -> LicenseExpr {
    let mut unique = BTreeSet::new();
    for operand in operands {
        match (op, operand.simplify_once()) {
            (Operator::And, LicenseExpr::And(inner)) | (Operator::Or, LicenseExpr::Or(inner)) => {
                unique.extend(inner);
            }
            (_, other) => {
                unique.insert(other);
            }
        }
    }

    // Absorption: in `A AND (A OR B)` the disjunction is implied by `A`, and
    // likewise any dual group whose terms include all terms of a sibling.
    let kept: Vec<LicenseExpr> = unique
        .iter()
        .filter(|candidate| {
            let Some(candidate_terms) = dual_terms(op, candidate) else {
                return true;
            };
            !unique.iter().any(|other| {
                other != *candidate && terms_of(op, other).is_subset(&candidate_terms)
            })
        })
        .cloned()
        .collect();

    match (op, kept.len()) {
        (_, 1) => kept.into_iter().next().unwrap_or_else(LicenseExpr::none),
        (Operator::And, _) => LicenseExpr::And(kept),
        (Operator::Or, _) => LicenseExpr::Or(kept),
    }
}

/// Terms of a group of the operator dual to `op`, if `expr` is one.
fn dual_terms(op: Operator, expr: &LicenseExpr) -> Option<BTreeSet<&LicenseExpr>> {
    match (op, expr) {
        (Operator::And, LicenseExpr::Or(terms)) | (Operator::Or, LicenseExpr::And(terms))
            if !terms.is_empty() =>
        {
            Some(terms.iter().collect())
        }
        _ => None,
    }
}

/// Terms of `expr` when read as a dual group; a non-group is a group of one.
fn terms_of(op: Operator, expr: &LicenseExpr) -> BTreeSet<&LicenseExpr> {
    dual_terms(op, expr).unwrap_or_else(|| BTreeSet::from([expr]))
}

impl fmt::Display for LicenseExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::License(license) => write!(f, "{license}"),
            Self::With(license, exception) => write!(f, "{license} WITH {exception}"),
            Self::And(operands) | Self::Or(operands) => {
                let separator = if matches!(self, Self::And(_)) {
                    " AND "
                } else {
                    " OR "
                };
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    operand.fmt_operand(f)?;
                }
                Ok(())
            }
        }
    }
}

impl std::str::FromStr for LicenseExpr {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
