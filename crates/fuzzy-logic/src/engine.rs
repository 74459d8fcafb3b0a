use crate::error::FuzzyError;
use crate::parser;
use crate::rule::{Connective, Rule};
use crate::variable::Variable;

/// Number of samples taken across the output range during centroid
/// defuzzification. Fixed so results are identical across platforms.
const CENTROID_SAMPLES: usize = 1001;

/// A configured Mamdani inference engine.
///
/// Inputs default to the range minimum until set. `process()` recomputes
/// every output; engines hold no other mutable state and can be pooled.
#[derive(Clone, Debug)]
pub struct Engine {
    inputs: Vec<Variable>,
    input_values: Vec<f64>,
    outputs: Vec<Variable>,
    output_values: Vec<f64>,
    rules: Vec<Rule>,
}

impl Engine {
    pub(crate) fn new(inputs: Vec<Variable>, outputs: Vec<Variable>, rules: Vec<Rule>) -> Self {
        let input_values = inputs.iter().map(|v| v.min).collect();
        let output_values = outputs.iter().map(|v| v.min).collect();

        Self {
            inputs,
            input_values,
            outputs,
            output_values,
            rules,
        }
    }

    /// Parses a text configuration into a ready engine.
    pub fn from_rules(source: &str) -> Result<Self, FuzzyError> {
        parser::parse(source)
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|v| v.name.as_str())
    }

    pub fn set_input(&mut self, name: &str, value: f64) -> Result<(), FuzzyError> {
        if !value.is_finite() {
            return Err(FuzzyError::NonFiniteInput(name.to_owned()));
        }

        let idx = self
            .inputs
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))?;

        self.input_values[idx] = self.inputs[idx].clamp(value);

        Ok(())
    }

    /// Runs inference, updating every output value.
    pub fn process(&mut self) {
        let activations: Vec<f64> = self.rules.iter().map(|r| self.activation(r)).collect();

        for (out_idx, variable) in self.outputs.iter().enumerate() {
            self.output_values[out_idx] = defuzzify(variable, |y| {
                let mut aggregated: f64 = 0.0;

                for (rule, activation) in self.rules.iter().zip(&activations) {
                    if rule.output_variable != out_idx || *activation == 0.0 {
                        continue;
                    }

                    let clipped = activation.min(variable.terms[rule.output_term].shape.membership(y));
                    aggregated = aggregated.max(clipped);
                }

                aggregated
            });
        }
    }

    pub fn output(&self, name: &str) -> Result<f64, FuzzyError> {
        let idx = self
            .outputs
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))?;

        Ok(self.output_values[idx])
    }

    fn activation(&self, rule: &Rule) -> f64 {
        let memberships = rule.antecedent.iter().map(|&(var, term)| {
            self.inputs[var].terms[term]
                .shape
                .membership(self.input_values[var])
        });

        match rule.connective {
            Connective::And => memberships.fold(1.0, f64::min),
            Connective::Or => memberships.fold(0.0, f64::max),
        }
    }
}

/// Centroid of the aggregated membership function over the output range.
/// Falls back to the range minimum when no rule fired.
fn defuzzify(variable: &Variable, aggregated: impl Fn(f64) -> f64) -> f64 {
    let step = (variable.max - variable.min) / (CENTROID_SAMPLES - 1) as f64;
    let mut weighted = 0.0;
    let mut total = 0.0;

    for i in 0..CENTROID_SAMPLES {
        let y = variable.min + step * i as f64;
        let mu = aggregated(y);

        weighted += y * mu;
        total += mu;
    }

    if total == 0.0 {
        variable.min
    } else {
        weighted / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
InputVariable: heat
  range: 0.0 1.0
  term: COLD Ramp 0.5 0.0
  term: HOT Ramp 0.5 1.0

OutputVariable: power
  range: 0.0 10.0
  term: LOW Ramp 5.0 0.0
  term: HIGH Ramp 5.0 10.0

RuleBlock:
  rule: if heat is COLD then power is HIGH
  rule: if heat is HOT then power is LOW
";

    #[test]
    fn cold_input_drives_power_high() {
        let mut engine = Engine::from_rules(CONFIG).unwrap();
        engine.set_input("heat", 0.0).unwrap();
        engine.process();

        assert!(engine.output("power").unwrap() > 5.0);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let mut a = Engine::from_rules(CONFIG).unwrap();
        let mut b = Engine::from_rules(CONFIG).unwrap();

        for engine in [&mut a, &mut b] {
            engine.set_input("heat", 0.37).unwrap();
            engine.process();
        }

        assert_eq!(a.output("power").unwrap(), b.output("power").unwrap());
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let mut engine = Engine::from_rules(CONFIG).unwrap();
        engine.set_input("heat", 42.0).unwrap();
        engine.process();
        let clamped = engine.output("power").unwrap();

        engine.set_input("heat", 1.0).unwrap();
        engine.process();

        assert_eq!(clamped, engine.output("power").unwrap());
    }

    #[test]
    fn unknown_input_is_rejected() {
        let mut engine = Engine::from_rules(CONFIG).unwrap();

        assert_eq!(
            engine.set_input("pressure", 1.0),
            Err(FuzzyError::UnknownVariable("pressure".into()))
        );
    }
}
