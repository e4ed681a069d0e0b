//! The fixed texts of the worked solutions: the idea behind each pattern, the hints shown to a
//! student who is stuck, and the laws each step applies.

/// The texts shown with every solution of one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternText {
    /// A one-paragraph summary of how the problem is solved.
    pub explanation_idea: &'static str,

    /// Hints, from the most general to the most specific.
    pub hints: &'static [&'static str],
}

pub const POWER_FRACTION: PatternText = PatternText {
    explanation_idea: "Simplify the expression with the laws of exponents before substituting \
        anything: raise powers to powers by multiplying the exponents, multiply powers of the \
        same base by adding the exponents, and divide them by subtracting the exponents. Only \
        then substitute the value of the variable into the single power that is left.",
    hints: &[
        "Do not substitute the value right away: simplify the expression first.",
        "A power raised to a power: (aᵐ)ⁿ = aᵐ·ⁿ.",
        "Powers of the same base are multiplied by adding the exponents: aᵐ · aⁿ = aᵐ⁺ⁿ.",
        "Powers of the same base are divided by subtracting the exponents: aᵐ/aⁿ = aᵐ⁻ⁿ.",
    ],
};

pub const RADICAL_POWER: PatternText = PatternText {
    explanation_idea: "First simplify the expression under the root with the laws of exponents. \
        Then write it as a perfect square times whatever is left, and take the perfect square out \
        of the root. Substitute the value of the variable last.",
    hints: &[
        "Simplify the expression under the root first.",
        "Look for a factor that is a perfect square: an even power, or a number such as 4, 9 or 16.",
        "The root of a square is the number itself: √a² = a for a ≥ 0.",
        "The root of a product is the product of the roots: √(ab) = √a · √b.",
    ],
};

pub const RADICAL_FRACTION: PatternText = PatternText {
    explanation_idea: "Take everything that is a perfect square out of each root, then multiply \
        the roots of the numerator into a single root. Write numerator and denominator as one \
        fraction and cancel the common factors. Substitute the value of the variable into the \
        simplified fraction.",
    hints: &[
        "Simplify each root on its own first: √(a²b) = a√b.",
        "The product of roots is the root of the product: √a · √b = √(ab).",
        "After multiplying, the expression under the root may become a perfect square.",
        "Cancel the factors the numerator and the denominator have in common.",
    ],
};

pub const POWER_OF_POWER: &str = "(aᵐ)ⁿ = aᵐ·ⁿ";
pub const PRODUCT_OF_POWERS: &str = "aᵐ · aⁿ = aᵐ⁺ⁿ";
pub const QUOTIENT_OF_POWERS: &str = "aᵐ/aⁿ = aᵐ⁻ⁿ";
pub const ROOT_OF_PRODUCT: &str = "√(ab) = √a · √b";
pub const ROOT_OF_SQUARE: &str = "√a² = a";
pub const EXTRACT_SQUARE: &str = "√(a²b) = a√b";
pub const PRODUCT_OF_ROOTS: &str = "√a · √b = √(ab)";
pub const QUOTIENT_OF_ROOTS: &str = "√a/√b = √(a/b)";
pub const CANCEL_FACTORS: &str = "(ac)/(bc) = a/b";

pub const COLLAPSE_POWER_OF_POWER: &str = "Raise the powers to a power by multiplying the exponents.";
pub const COMBINE_NUMERATOR_PRODUCT: &str = "Multiply the powers of the same base in the numerator by adding the exponents.";
pub const DIVIDE_BY_DENOMINATOR: &str = "Divide by the denominator by subtracting the exponents.";
pub const SIMPLIFY_EXPONENT_UNDER_ROOT: &str = "Simplify the expression under the root with the laws of exponents.";
pub const SPLIT_ROOT_INTO_FACTORS: &str = "Write the expression under the root as a perfect square times the remaining factor.";
pub const EXTRACT_PERFECT_SQUARE: &str = "Take the perfect square out of the root.";
pub const COMBINE_NUMERATOR: &str = "Multiply the factors of the numerator into a single root.";
pub const COMBINE_DENOMINATOR: &str = "Simplify the denominator.";
pub const FORM_FRACTION: &str = "Write the simplified numerator over the simplified denominator.";
pub const REDUCE_COMMON_RADICALS: &str = "Cancel the common factors of the numerator and the denominator.";
pub const SUBSTITUTE_VARIABLES: &str = "Substitute the value of the variables and compute.";
pub const DECIMALIZE: &str = "Write the result as a decimal.";

/// Describes the decomposition of the `index`-th root (counting from 1) of the numerator.
pub fn decompose_description(index: usize, count: usize) -> String {
    if count == 1 {
        "Take the perfect squares out of the root.".to_string()
    } else {
        format!("Take the perfect squares out of root {} of {}.", index, count)
    }
}
