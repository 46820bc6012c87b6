// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

/// Revisions of IEEE 1076 the model can be checked against
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Ord, PartialOrd, Hash)]
pub enum VHDLStandard {
    VHDL1993,
    #[default]
    VHDL2008,
    VHDL2019,
}

impl VHDLStandard {
    /// Context declarations and context references were introduced with VHDL-2008
    pub fn supports_contexts(&self) -> bool {
        *self >= VHDLStandard::VHDL2008
    }

    /// Conditional expressions (`a when c else b`) were introduced with VHDL-2019
    pub fn supports_conditional_expressions(&self) -> bool {
        *self >= VHDLStandard::VHDL2019
    }
}

impl TryFrom<&str> for VHDLStandard {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use VHDLStandard::*;
        Ok(match value {
            "1993" | "93" => VHDL1993,
            "2008" | "08" => VHDL2008,
            "2019" | "19" => VHDL2019,
            _ => return Err(()),
        })
    }
}

impl AsRef<str> for VHDLStandard {
    fn as_ref(&self) -> &str {
        use VHDLStandard::*;
        match self {
            VHDL1993 => "1993",
            VHDL2008 => "2008",
            VHDL2019 => "2019",
        }
    }
}

impl std::fmt::Display for VHDLStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VHDL-{}", self.as_ref())
    }
}
