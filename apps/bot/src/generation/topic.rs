use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

/// Subject-matter labels used to seed generation. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    OperatingSystems,
    Dbms,
    ComputerNetworks,
    OopsConcepts,
    Algorithms,
    PythonProgramming,
    DataStructures,
    JavaScriptProgramming,
    SoftwareEngineering,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::OperatingSystems,
        Topic::Dbms,
        Topic::ComputerNetworks,
        Topic::OopsConcepts,
        Topic::Algorithms,
        Topic::PythonProgramming,
        Topic::DataStructures,
        Topic::JavaScriptProgramming,
        Topic::SoftwareEngineering,
    ];

    /// Human-readable label, as sent in the prompt and stored with each record.
    pub fn label(self) -> &'static str {
        match self {
            Topic::OperatingSystems => "Operating Systems",
            Topic::Dbms => "DBMS",
            Topic::ComputerNetworks => "Computer Networks",
            Topic::OopsConcepts => "OOPs Concepts",
            Topic::Algorithms => "Algorithms",
            Topic::PythonProgramming => "Python Programming",
            Topic::DataStructures => "Data Structures",
            Topic::JavaScriptProgramming => "JavaScript Programming",
            Topic::SoftwareEngineering => "Software Engineering",
        }
    }

    /// Uniform pick over `Topic::ALL`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Topic {
        *Self::ALL.choose(rng).unwrap_or(&Topic::Algorithms)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
