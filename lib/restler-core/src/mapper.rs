//! Binding call arguments to a [`ServiceMethodInvocation`].

use crate::{
    Argument, Error, MethodDescription, ParamLocation, Result, ServiceMethodInvocation,
    placeholders,
};

/// Turns a method description and its call arguments into an invocation.
///
/// Implementations must be pure. Any `Fn(&'static MethodDescription,
/// Vec<Argument>) -> Result<ServiceMethodInvocation>` closure is a mapper.
pub trait InvocationMapper: Send + Sync {
    /// Build the invocation for one call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mapping`] when the arguments cannot be bound.
    fn map(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Result<ServiceMethodInvocation>;
}

impl<F> InvocationMapper for F
where
    F: Fn(&'static MethodDescription, Vec<Argument>) -> Result<ServiceMethodInvocation>
        + Send
        + Sync,
{
    fn map(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Result<ServiceMethodInvocation> {
        self(method, args)
    }
}

/// Binds each argument by the location of its declared parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInvocationMapper;

impl InvocationMapper for DefaultInvocationMapper {
    fn map(
        &self,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Result<ServiceMethodInvocation> {
        let fail = |message: String| Error::mapping(method.name, message);

        if args.len() != method.params.len() {
            return Err(fail(format!(
                "expected {} argument(s), got {}",
                method.params.len(),
                args.len()
            )));
        }

        let mut invocation = ServiceMethodInvocation::new(method, Vec::new());

        for (param, arg) in method.params.iter().zip(&args) {
            match (param.location, arg) {
                (_, Argument::Absent) if param.required || param.location == ParamLocation::Path => {
                    return Err(fail(format!(
                        "missing {} parameter `{}`",
                        param.location, param.name
                    )));
                }
                (_, Argument::Absent) => {}
                (_, Argument::Invalid(message)) => {
                    return Err(fail(format!(
                        "cannot serialize {} parameter `{}`: {message}",
                        param.location, param.name
                    )));
                }
                (ParamLocation::Path, Argument::Value(value)) => {
                    invocation
                        .path_variables
                        .insert(param.name.to_string(), value.clone());
                }
                (ParamLocation::Path, Argument::Values(_)) => {
                    return Err(fail(format!(
                        "path variable `{}` cannot take multiple values",
                        param.name
                    )));
                }
                (ParamLocation::Query, Argument::Value(value)) => {
                    invocation
                        .query_params
                        .push((param.name.to_string(), value.clone()));
                }
                (ParamLocation::Query, Argument::Values(values)) => {
                    invocation.query_params.extend(
                        values
                            .iter()
                            .map(|value| (param.name.to_string(), value.clone())),
                    );
                }
                (ParamLocation::Header, Argument::Value(value)) => {
                    invocation
                        .headers
                        .push((param.name.to_string(), value.clone()));
                }
                (ParamLocation::Header, Argument::Values(values)) => {
                    invocation
                        .headers
                        .push((param.name.to_string(), values.join(",")));
                }
                (ParamLocation::Body, Argument::Body(bytes)) => {
                    invocation.body = Some(bytes.clone());
                }
                (location, other) => {
                    return Err(fail(format!(
                        "argument {other:?} cannot be bound as {location} parameter `{}`",
                        param.name
                    )));
                }
            }
        }

        let names = placeholders(method.uri_template).map_err(|err| fail(err.to_string()))?;
        if let Some(unbound) = names
            .iter()
            .find(|name| !invocation.path_variables.contains_key(**name))
        {
            return Err(fail(format!("no argument bound to placeholder `{unbound}`")));
        }

        invocation.args = args;
        Ok(invocation)
    }
}
