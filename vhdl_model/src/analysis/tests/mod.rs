// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2019, Olof Kraigher olof.kraigher@gmail.com

mod circular_dependencies;
mod compile_order;
mod dependency_graph;
mod util;

pub use self::util::*;
pub use crate::analysis::*;
pub use crate::ast::*;
pub use crate::data::*;
pub use crate::design::*;
