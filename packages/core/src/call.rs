//! One invocation of a route: a descriptor bound to concrete arguments.

use serde_json::Value;

use crate::descriptor::RouteDescriptor;
use crate::error::RoutingError;
use crate::notation::Segment;

/// Arguments bound to a compiled route.
///
/// Construction validates the argument list against the declared
/// parameters, after which every segment of the destination resolves.
#[derive(Debug)]
pub struct RouteCall<'a> {
    descriptor: &'a RouteDescriptor,
    args: Vec<Value>,
}

impl<'a> RouteCall<'a> {
    pub fn new(descriptor: &'a RouteDescriptor, args: Vec<Value>) -> Result<Self, RoutingError> {
        let expected = descriptor.parameters.len();
        if args.len() != expected {
            return Err(RoutingError::ArgumentCount {
                method: descriptor.method_id.clone(),
                expected,
                actual: args.len(),
            });
        }

        for index in descriptor.notation.param_refs() {
            if args[index].is_null() {
                return Err(RoutingError::NullArgument {
                    method: descriptor.method_id.clone(),
                    index,
                    name: descriptor.parameters[index].name.clone(),
                });
            }
        }

        Ok(Self { descriptor, args })
    }

    pub fn descriptor(&self) -> &RouteDescriptor {
        self.descriptor
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The body argument, when the route declares one.
    pub fn body(&self) -> Option<&Value> {
        self.descriptor.body_index.map(|i| &self.args[i])
    }

    /// Resolve one segment to its text.
    pub fn resolve(&self, segment: &Segment) -> String {
        match segment {
            Segment::Literal(text) => text.clone(),
            Segment::ParamRef(index) => match &self.args[*index] {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            // Compilation only succeeds once every called accessor is bound.
            Segment::MethodCall(name) => self
                .descriptor
                .accessors
                .get(name)
                .map(|accessor| accessor.call())
                .unwrap_or_default(),
        }
    }

    /// Concatenate all resolved segments into the destination.
    pub fn destination(&self) -> String {
        self.descriptor
            .notation
            .segments()
            .iter()
            .map(|segment| self.resolve(segment))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Bindings;
    use crate::metadata::{MethodMetadata, Parameter};
    use serde_json::json;

    fn compile(metadata: MethodMetadata, bindings: &Bindings) -> RouteDescriptor {
        RouteDescriptor::compile(&metadata, bindings).unwrap()
    }

    #[test]
    fn single_parameter() {
        let descriptor = compile(
            MethodMetadata::get("userDetails", "/user/{0 name}")
                .with_parameter(Parameter::text("name")),
            &Bindings::new(),
        );

        let call = RouteCall::new(&descriptor, vec![json!("alice")]).unwrap();
        assert_eq!(call.destination(), "/user/alice");
    }

    #[test]
    fn query_parameter() {
        let descriptor = compile(
            MethodMetadata::get("userDetails", "/user/{0}?context={1}")
                .with_parameter(Parameter::text("name"))
                .with_parameter(Parameter::text("context")),
            &Bindings::new(),
        );

        let call = RouteCall::new(&descriptor, vec![json!("alice"), json!("admin")]).unwrap();
        assert_eq!(call.destination(), "/user/alice?context=admin");
    }

    #[test]
    fn non_text_arguments_use_their_json_form() {
        let descriptor = compile(
            MethodMetadata::get("page", "/items/{0}/{1}/{2}")
                .with_parameter(Parameter::new("page", "u32"))
                .with_parameter(Parameter::new("active", "bool"))
                .with_parameter(Parameter::new("ratio", "f64")),
            &Bindings::new(),
        );

        let call = RouteCall::new(&descriptor, vec![json!(3), json!(true), json!(0.5)]).unwrap();
        assert_eq!(call.destination(), "/items/3/true/0.5");
    }

    #[test]
    fn accessor_contributes_to_destination() {
        let bindings = Bindings::new().with_accessor("userServicePath", || "/users".to_string());
        let descriptor = compile(
            MethodMetadata::get("user", "{userServicePath()}/{0}")
                .with_parameter(Parameter::text("name")),
            &bindings,
        );

        let call = RouteCall::new(&descriptor, vec![json!("bob")]).unwrap();
        assert_eq!(call.destination(), "/users/bob");
    }

    #[test]
    fn resolved_destination_matches_hand_formatting() {
        let descriptor = compile(
            MethodMetadata::get("search", "/s/{1}/{0}\\{raw\\}")
                .with_parameter(Parameter::text("a"))
                .with_parameter(Parameter::text("b")),
            &Bindings::new(),
        );

        let (a, b) = ("x", "y");
        let call = RouteCall::new(&descriptor, vec![json!(a), json!(b)]).unwrap();
        assert_eq!(call.destination(), format!("/s/{}/{}{{raw}}", b, a));
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let descriptor = compile(
            MethodMetadata::get("user", "/user/{0}").with_parameter(Parameter::text("name")),
            &Bindings::new(),
        );

        let err = RouteCall::new(&descriptor, vec![]).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::ArgumentCount {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn null_referenced_argument_is_rejected() {
        let descriptor = compile(
            MethodMetadata::get("user", "/user/{0}").with_parameter(Parameter::text("name")),
            &Bindings::new(),
        );

        let err = RouteCall::new(&descriptor, vec![Value::Null]).unwrap_err();
        assert!(matches!(err, RoutingError::NullArgument { index: 0, ref name, .. } if name == "name"));
    }

    #[test]
    fn body_argument_is_exposed() {
        let descriptor = compile(
            MethodMetadata::post("register", "/user")
                .with_parameter(Parameter::new("user", "User").as_body()),
            &Bindings::new(),
        );

        let call = RouteCall::new(&descriptor, vec![json!({"name": "test3"})]).unwrap();
        assert_eq!(call.body(), Some(&json!({"name": "test3"})));
        assert_eq!(call.destination(), "/user");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Resolving every segment in order reproduces the formatted destination.
            #[test]
            fn prop_destination_matches_formatting(
                root in ".*",
                name in ".*",
                context in ".*",
            ) {
                let accessor_root = root.clone();
                let bindings = Bindings::new().with_accessor("root", move || accessor_root.clone());
                let descriptor = compile(
                    MethodMetadata::get("userDetails", "{root()}/user/{0 name}?context={1}")
                        .with_parameter(Parameter::text("name"))
                        .with_parameter(Parameter::text("context")),
                    &bindings,
                );

                let call = RouteCall::new(&descriptor, vec![json!(name), json!(context)]).unwrap();
                prop_assert_eq!(
                    call.destination(),
                    format!("{}/user/{}?context={}", root, name, context)
                );
            }
        }
    }
}
