/// How a rule's antecedent clauses combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    /// min over clause memberships.
    And,
    /// max over clause memberships.
    Or,
}

/// One inference rule, resolved to variable/term indices at parse time.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// `(input variable index, term index)` pairs.
    pub antecedent: Vec<(usize, usize)>,
    pub connective: Connective,
    pub output_variable: usize,
    pub output_term: usize,
}
