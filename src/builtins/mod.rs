// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

pub mod comparison;
pub mod dates;
pub mod instance;
pub mod logical;
pub mod lookup;
pub mod numbers;
pub mod strings;
pub mod utils;

use crate::error::Result;
use crate::expr::{Call, ExprVal};
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

/// Implementation of an operator whose arguments are evaluated (and coerced
/// to their declared types) before the call.
pub type BuiltinFcn = fn(&Interpreter, &Call, &[Value]) -> Result<Value>;

/// Implementation of an operator that receives its arguments unevaluated and
/// decides itself which of them to evaluate.
pub type LazyFcn = fn(&Interpreter, &Call) -> Result<Value>;

pub enum Implementation {
    Strict(BuiltinFcn),
    Lazy(LazyFcn),
}

/// Every operator known to the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    // logical
    And,
    Or,
    Not,
    If,

    // relational
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEq,
    LessThan,
    LessThanEq,

    // text
    Concat,
    LowerCase,
    UpperCase,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    StringLength,
    CommaContains,

    // numeric
    Round,

    // dates
    FormatDate,

    // data lookup
    DataModel,
    Component,
    DisplayValue,
    Argv,
    Value,
    ExternalApi,

    // instance, process and application lookups
    InstanceContext,
    FrontendSettings,
    Text,
    Language,
    GatewayAction,
    CountDataElements,
    AuthContext,
    HasRole,
    LinkToPage,
    LinkToComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgVariant {
    Required,
    Optional,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgDef {
    #[serde(rename = "type")]
    pub ty: ExprVal,
    pub variant: ArgVariant,
}

/// Signature of an operator, as published to design-time tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuncDef {
    pub name: &'static str,
    pub args: &'static [ArgDef],
    pub returns: ExprVal,
}

const fn required(ty: ExprVal) -> ArgDef {
    ArgDef {
        ty,
        variant: ArgVariant::Required,
    }
}

const fn optional(ty: ExprVal) -> ArgDef {
    ArgDef {
        ty,
        variant: ArgVariant::Optional,
    }
}

const fn rest(ty: ExprVal) -> ArgDef {
    ArgDef {
        ty,
        variant: ArgVariant::Rest,
    }
}

const fn def(name: &'static str, args: &'static [ArgDef], returns: ExprVal) -> FuncDef {
    FuncDef {
        name,
        args,
        returns,
    }
}

use crate::expr::ExprVal::{Any, Boolean, Date, Number as Num, String as Str};

const STR_STR: &[ArgDef] = &[required(Str), required(Str)];
const NUM_NUM: &[ArgDef] = &[required(Num), required(Num)];
const STR: &[ArgDef] = &[required(Str)];
const BOOLS: &[ArgDef] = &[required(Boolean), rest(Boolean)];
const BOOL: &[ArgDef] = &[required(Boolean)];
const NUM: &[ArgDef] = &[required(Num)];
const OPT_STR: &[ArgDef] = &[optional(Str)];
const REST_STR: &[ArgDef] = &[rest(Str)];
const NONE: &[ArgDef] = &[];
const IF_ARGS: &[ArgDef] = &[required(Boolean), required(Any), optional(Str), optional(Any)];
const ROUND_ARGS: &[ArgDef] = &[required(Num), optional(Num)];
const DATA_MODEL_ARGS: &[ArgDef] = &[required(Str), optional(Str)];
const FORMAT_DATE_ARGS: &[ArgDef] = &[required(Date), optional(Str)];

impl Func {
    pub fn from_name(name: &str) -> Option<Func> {
        BUILTINS.get(name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.definition().name
    }

    pub fn definition(&self) -> &'static FuncDef {
        const AND: FuncDef = def("and", BOOLS, Boolean);
        const OR: FuncDef = def("or", BOOLS, Boolean);
        const NOT: FuncDef = def("not", BOOL, Boolean);
        const IF: FuncDef = def("if", IF_ARGS, Any);
        const EQUALS: FuncDef = def("equals", STR_STR, Boolean);
        const NOT_EQUALS: FuncDef = def("notEquals", STR_STR, Boolean);
        const GREATER_THAN: FuncDef = def("greaterThan", NUM_NUM, Boolean);
        const GREATER_THAN_EQ: FuncDef = def("greaterThanEq", NUM_NUM, Boolean);
        const LESS_THAN: FuncDef = def("lessThan", NUM_NUM, Boolean);
        const LESS_THAN_EQ: FuncDef = def("lessThanEq", NUM_NUM, Boolean);
        const CONCAT: FuncDef = def("concat", REST_STR, Str);
        const LOWER_CASE: FuncDef = def("lowerCase", STR, Str);
        const UPPER_CASE: FuncDef = def("upperCase", STR, Str);
        const CONTAINS: FuncDef = def("contains", STR_STR, Boolean);
        const NOT_CONTAINS: FuncDef = def("notContains", STR_STR, Boolean);
        const STARTS_WITH: FuncDef = def("startsWith", STR_STR, Boolean);
        const ENDS_WITH: FuncDef = def("endsWith", STR_STR, Boolean);
        const STRING_LENGTH: FuncDef = def("stringLength", STR, Num);
        const COMMA_CONTAINS: FuncDef = def("commaContains", STR_STR, Boolean);
        const ROUND: FuncDef = def("round", ROUND_ARGS, Str);
        const FORMAT_DATE: FuncDef = def("formatDate", FORMAT_DATE_ARGS, Str);
        const DATA_MODEL: FuncDef = def("dataModel", DATA_MODEL_ARGS, Any);
        const COMPONENT: FuncDef = def("component", STR, Any);
        const DISPLAY_VALUE: FuncDef = def("displayValue", STR, Str);
        const ARGV: FuncDef = def("argv", NUM, Any);
        const VALUE: FuncDef = def("value", OPT_STR, Any);
        const EXTERNAL_API: FuncDef = def("externalApi", STR_STR, Str);
        const INSTANCE_CONTEXT: FuncDef = def("instanceContext", STR, Str);
        const FRONTEND_SETTINGS: FuncDef = def("frontendSettings", STR, Any);
        const TEXT: FuncDef = def("text", STR, Str);
        const LANGUAGE: FuncDef = def("language", NONE, Str);
        const GATEWAY_ACTION: FuncDef = def("gatewayAction", NONE, Str);
        const COUNT_DATA_ELEMENTS: FuncDef = def("countDataElements", STR, Num);
        const AUTH_CONTEXT: FuncDef = def("authContext", STR, Boolean);
        const HAS_ROLE: FuncDef = def("hasRole", STR, Boolean);
        const LINK_TO_PAGE: FuncDef = def("linkToPage", STR_STR, Str);
        const LINK_TO_COMPONENT: FuncDef = def("linkToComponent", STR_STR, Str);

        match self {
            Func::And => &AND,
            Func::Or => &OR,
            Func::Not => &NOT,
            Func::If => &IF,
            Func::Equals => &EQUALS,
            Func::NotEquals => &NOT_EQUALS,
            Func::GreaterThan => &GREATER_THAN,
            Func::GreaterThanEq => &GREATER_THAN_EQ,
            Func::LessThan => &LESS_THAN,
            Func::LessThanEq => &LESS_THAN_EQ,
            Func::Concat => &CONCAT,
            Func::LowerCase => &LOWER_CASE,
            Func::UpperCase => &UPPER_CASE,
            Func::Contains => &CONTAINS,
            Func::NotContains => &NOT_CONTAINS,
            Func::StartsWith => &STARTS_WITH,
            Func::EndsWith => &ENDS_WITH,
            Func::StringLength => &STRING_LENGTH,
            Func::CommaContains => &COMMA_CONTAINS,
            Func::Round => &ROUND,
            Func::FormatDate => &FORMAT_DATE,
            Func::DataModel => &DATA_MODEL,
            Func::Component => &COMPONENT,
            Func::DisplayValue => &DISPLAY_VALUE,
            Func::Argv => &ARGV,
            Func::Value => &VALUE,
            Func::ExternalApi => &EXTERNAL_API,
            Func::InstanceContext => &INSTANCE_CONTEXT,
            Func::FrontendSettings => &FRONTEND_SETTINGS,
            Func::Text => &TEXT,
            Func::Language => &LANGUAGE,
            Func::GatewayAction => &GATEWAY_ACTION,
            Func::CountDataElements => &COUNT_DATA_ELEMENTS,
            Func::AuthContext => &AUTH_CONTEXT,
            Func::HasRole => &HAS_ROLE,
            Func::LinkToPage => &LINK_TO_PAGE,
            Func::LinkToComponent => &LINK_TO_COMPONENT,
        }
    }

    pub fn implementation(&self) -> Implementation {
        use Implementation::{Lazy, Strict};
        match self {
            Func::And => Lazy(logical::and),
            Func::Or => Lazy(logical::or),
            Func::If => Lazy(logical::if_else),
            Func::Not => Strict(logical::not),
            Func::Equals => Strict(comparison::equals),
            Func::NotEquals => Strict(comparison::not_equals),
            Func::GreaterThan => Strict(comparison::greater_than),
            Func::GreaterThanEq => Strict(comparison::greater_than_eq),
            Func::LessThan => Strict(comparison::less_than),
            Func::LessThanEq => Strict(comparison::less_than_eq),
            Func::Concat => Strict(strings::concat),
            Func::LowerCase => Strict(strings::lower_case),
            Func::UpperCase => Strict(strings::upper_case),
            Func::Contains => Strict(strings::contains),
            Func::NotContains => Strict(strings::not_contains),
            Func::StartsWith => Strict(strings::starts_with),
            Func::EndsWith => Strict(strings::ends_with),
            Func::StringLength => Strict(strings::string_length),
            Func::CommaContains => Strict(strings::comma_contains),
            Func::Round => Strict(numbers::round),
            Func::FormatDate => Strict(dates::format_date),
            Func::DataModel => Strict(lookup::data_model),
            Func::Component => Strict(lookup::component),
            Func::DisplayValue => Strict(lookup::display_value),
            Func::Argv => Strict(lookup::argv),
            Func::Value => Strict(lookup::value),
            Func::ExternalApi => Strict(lookup::external_api),
            Func::InstanceContext => Strict(instance::instance_context),
            Func::FrontendSettings => Strict(instance::frontend_settings),
            Func::Text => Strict(instance::text),
            Func::Language => Strict(instance::language),
            Func::GatewayAction => Strict(instance::gateway_action),
            Func::CountDataElements => Strict(instance::count_data_elements),
            Func::AuthContext => Strict(instance::auth_context),
            Func::HasRole => Strict(instance::has_role),
            Func::LinkToPage => Strict(instance::link_to_page),
            Func::LinkToComponent => Strict(instance::link_to_component),
        }
    }
}

#[rustfmt::skip]
lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Func> = {
	let mut m : HashMap<&'static str, Func>  = HashMap::new();

	logical::register(&mut m);
	comparison::register(&mut m);
	strings::register(&mut m);
	numbers::register(&mut m);
	dates::register(&mut m);
	lookup::register(&mut m);
	instance::register(&mut m);

	m
    };
}

/// All operator signatures, sorted by name.
pub fn manifest() -> Vec<&'static FuncDef> {
    let mut defs: Vec<&'static FuncDef> = BUILTINS.values().map(|f| f.definition()).collect();
    defs.sort_by_key(|d| d.name);
    defs
}
