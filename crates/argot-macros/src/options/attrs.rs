//! Attribute parsing for the Options derive macro.
//!
//! Field attributes look like `#[opt(flag = "-n,--name", default = "Luke")]`,
//! container attributes like `#[opt(help = "Say hello")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, LitStr, Meta, Result, Token,
};

/// Field-level attributes from `#[opt(...)]`.
#[derive(Debug, Clone)]
pub struct OptAttr {
    /// Comma-separated flag list, the last entry is canonical.
    pub flag: Option<LitStr>,
    pub help: Option<LitStr>,
    /// Default value text; `"-"` marks the field optional.
    pub default: Option<LitStr>,
    /// Environment variable name; `"-"` disables env lookup.
    pub env: Option<LitStr>,
    pub hidden: bool,
    /// Merge the fields of a nested options record.
    pub flatten: bool,
    /// Leave the field out of the schema and fill it with `Default`.
    pub skip: bool,
    pub span: Span,
}

impl Default for OptAttr {
    fn default() -> Self {
        OptAttr {
            flag: None,
            help: None,
            default: None,
            env: None,
            hidden: false,
            flatten: false,
            skip: false,
            span: Span::call_site(),
        }
    }
}

impl OptAttr {
    fn merge(&mut self, other: OptAttr) {
        if other.flag.is_some() {
            self.flag = other.flag;
        }
        if other.help.is_some() {
            self.help = other.help;
        }
        if other.default.is_some() {
            self.default = other.default;
        }
        if other.env.is_some() {
            self.env = other.env;
        }
        self.hidden |= other.hidden;
        self.flatten |= other.flatten;
        self.skip |= other.skip;
        self.span = other.span;
    }
}

impl Parse for OptAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = OptAttr {
            span: input.span(),
            ..OptAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("hidden") {
                        attr.hidden = true;
                    } else if p.is_ident("flatten") {
                        attr.flatten = true;
                    } else if p.is_ident("skip") {
                        attr.skip = true;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "unknown opt flag. Expected: hidden, flatten or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("flag") {
                        attr.flag = Some(lit_str(&nv.value, "flag")?);
                    } else if nv.path.is_ident("help") {
                        attr.help = Some(lit_str(&nv.value, "help")?);
                    } else if nv.path.is_ident("default") {
                        attr.default = Some(lit_str(&nv.value, "default")?);
                    } else if nv.path.is_ident("env") {
                        attr.env = Some(lit_str(&nv.value, "env")?);
                    } else if nv.path.is_ident("hidden") {
                        attr.hidden = lit_bool(&nv.value)?;
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown opt attribute. Expected: flag, help, default, env or hidden",
                        ));
                    }
                }

                Meta::List(list) => {
                    return Err(Error::new(
                        list.span(),
                        "unexpected nested list in opt attribute",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Container-level attributes from `#[opt(...)]` on the struct itself.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// One-line help for the command built from this record.
    pub help: Option<LitStr>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("help") => {
                    attr.help = Some(lit_str(&nv.value, "help")?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown container attribute. Expected: help = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Collects every `#[opt(...)]` attribute on a field into one value.
pub fn parse_opt_attrs(attrs: &[Attribute]) -> Result<Option<OptAttr>> {
    let mut found: Option<OptAttr> = None;
    for attr in attrs {
        if attr.path().is_ident("opt") {
            let parsed = attr.parse_args::<OptAttr>()?;
            match found.as_mut() {
                Some(existing) => existing.merge(parsed),
                None => found = Some(parsed),
            }
        }
    }
    Ok(found)
}

/// Extracts the container `#[opt(...)]` attribute, if any.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("opt") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}

/// Splits a flag list and returns the trimmed names.
///
/// Every name must be non-empty and start with `-`.
pub fn split_flags(flag: &LitStr) -> Result<Vec<String>> {
    let value = flag.value();
    let mut names = Vec::new();
    for name in value.split(',') {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::new(flag.span(), "empty flag name in flag list"));
        }
        if !name.starts_with('-') {
            return Err(Error::new(
                flag.span(),
                format!("flag '{}' must start with '-'", name),
            ));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

fn lit_str(expr: &Expr, key: &str) -> Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        _ => Err(Error::new(
            expr.span(),
            format!("{} must be a string literal", key),
        )),
    }
}

fn lit_bool(expr: &Expr) -> Result<bool> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Bool(b), ..
        }) => Ok(b.value),
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => match s.value().as_str() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" | "" => Ok(false),
            _ => Err(Error::new(s.span(), "hidden must be a boolean")),
        },
        _ => Err(Error::new(expr.span(), "hidden must be a boolean")),
    }
}
