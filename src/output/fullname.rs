// when we render an element or attribute name we need to know which prefix
// to write it with, and which xmlns declarations make that prefix mean the
// right thing. this data structure keeps the in-scope bindings per open
// element so we never have to wander the tree to find them.

use ahash::HashSet;

use crate::domdata::{Dom, Node};
use crate::error::Error;
use crate::name::{QName, XMLNS_NAMESPACE, XML_NAMESPACE};

// (prefix, namespace) bindings in declaration order; the empty prefix is the
// default namespace and an empty namespace undeclares. later entries shadow
// earlier ones.
type Bindings = Vec<(String, String)>;

#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: Bindings,
}

impl Scope {
    fn namespace_by_prefix(&self, prefix: &str) -> &str {
        match prefix {
            "xml" => XML_NAMESPACE,
            "xmlns" => XMLNS_NAMESPACE,
            _ => self
                .bindings
                .iter()
                .rev()
                .find(|(p, _)| p == prefix)
                .map_or("", |(_, ns)| ns.as_str()),
        }
    }

    fn is_bound(&self, prefix: &str) -> bool {
        !self.namespace_by_prefix(prefix).is_empty()
    }

    // the most recently declared non-empty prefix that still maps to this
    // namespace; attributes can't use the default namespace
    fn prefix_by_namespace(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .filter(|(p, ns)| !p.is_empty() && ns == namespace)
            .map(|(p, _)| p.as_str())
            .find(|p| self.namespace_by_prefix(p) == namespace)
    }

    fn bind(&mut self, prefix: &str, namespace: &str) {
        self.bindings.push((prefix.to_string(), namespace.to_string()));
    }
}

/// The decisions the normalizer makes for a single element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ElementNames {
    /// The prefix the element is written with.
    pub(crate) prefix: String,
    /// The declarations to write: the default namespace (empty prefix)
    /// first, then prefixed ones.
    pub(crate) declarations: Vec<(String, String)>,
    /// The non-declaration attributes with the prefix to write them with.
    pub(crate) attributes: Vec<(Node, String)>,
}

impl ElementNames {
    // a declaration as the attribute name and value to write
    pub(crate) fn declaration_attributes(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.declarations.iter().map(|(prefix, namespace)| {
            if prefix.is_empty() {
                ("xmlns".to_string(), namespace.as_str())
            } else {
                (format!("xmlns:{}", prefix), namespace.as_str())
            }
        })
    }
}

pub(crate) fn qualified(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}

/// Works out per element which prefixes and namespace declarations are
/// needed so that the written document means the same as the tree.
///
/// Call [`NamespaceNormalizer::push`] when entering an element and
/// [`NamespaceNormalizer::pop`] when leaving it.
pub(crate) struct NamespaceNormalizer<'a> {
    dom: &'a Dom,
    stack: Vec<Scope>,
    counter: usize,
}

impl<'a> NamespaceNormalizer<'a> {
    pub(crate) fn new(dom: &'a Dom) -> Self {
        Self::with_scope(dom, Vec::new())
    }

    /// Start inside an existing scope, given as bindings in declaration
    /// order (outermost first).
    pub(crate) fn with_scope(dom: &'a Dom, bindings: Vec<(String, String)>) -> Self {
        Self {
            dom,
            stack: vec![Scope { bindings }],
            counter: 0,
        }
    }

    fn top(&self) -> &Scope {
        // the stack always has the initial scope at the bottom
        &self.stack[self.stack.len() - 1]
    }

    pub(crate) fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    // a fresh prefix NS1, NS2, ... that is not yet in use
    fn synthesize_prefix(&mut self, scope: &Scope) -> String {
        loop {
            self.counter += 1;
            let prefix = format!("NS{}", self.counter);
            if !scope.is_bound(&prefix) {
                return prefix;
            }
        }
    }

    /// Enter an element and decide how to write it.
    pub(crate) fn push(&mut self, element: Node) -> Result<ElementNames, Error> {
        let parent = self.top().clone();
        let mut scope = parent.clone();

        // own declarations, in order; a later one for the same prefix wins
        let mut own: Vec<(String, String)> = Vec::new();
        let mut plain_attributes = Vec::new();
        for attribute in self.dom.attributes(element) {
            let Some(value) = self.dom.attribute(attribute) else {
                continue;
            };
            match value.name.declared_prefix() {
                Some("xml") | Some("xmlns") => {}
                Some(prefix) => {
                    set_binding(&mut own, prefix, value.value());
                    scope.bind(prefix, value.value());
                }
                None => plain_attributes.push((attribute, value.name.clone())),
            }
        }

        let name = match self.dom.element(element) {
            Some(e) => e.name.clone(),
            None => return Ok(ElementNames::default()),
        };
        let prefix = self.element_prefix(&name, &mut own, &mut scope);

        let mut attributes = Vec::new();
        let mut written = HashSet::default();
        let mut expanded = HashSet::default();
        for (attribute, name) in plain_attributes {
            let prefix = self.attribute_prefix(&name, &mut own, &mut scope);
            if !written.insert(qualified(&prefix, &name.local_name)) {
                return Err(Error::NamespaceError(format!(
                    "attribute {} appears twice",
                    qualified(&prefix, &name.local_name)
                )));
            }
            if !name.namespace_uri.is_empty()
                && !expanded.insert((name.namespace_uri.clone(), name.local_name.clone()))
            {
                return Err(Error::NamespaceError(format!(
                    "attribute {{{}}}{} appears twice",
                    name.namespace_uri, name.local_name
                )));
            }
            attributes.push((attribute, prefix));
        }

        // default first, and nothing that the parent already says
        let mut declarations = Vec::new();
        for (prefix, namespace) in own.iter() {
            if parent.namespace_by_prefix(prefix) == namespace {
                continue;
            }
            if !prefix.is_empty() && namespace.is_empty() {
                // prefixes cannot be undeclared in XML 1.0
                continue;
            }
            if prefix.is_empty() {
                declarations.insert(0, (prefix.clone(), namespace.clone()));
            } else {
                declarations.push((prefix.clone(), namespace.clone()));
            }
        }

        self.stack.push(scope);
        Ok(ElementNames {
            prefix,
            declarations,
            attributes,
        })
    }

    fn element_prefix(&mut self, name: &QName, own: &mut Bindings, scope: &mut Scope) -> String {
        let (namespace, prefix) = (name.namespace_uri(), name.prefix());
        if namespace == XML_NAMESPACE {
            return "xml".to_string();
        }
        if namespace.is_empty() {
            if scope.is_bound("") {
                // undeclare the default so the name is in no namespace
                set_binding(own, "", "");
                scope.bind("", "");
            }
            return prefix.to_string();
        }
        if scope.namespace_by_prefix(prefix) == namespace {
            return prefix.to_string();
        }
        if has_binding(own, prefix) || !scope.is_bound(prefix) {
            if has_binding(own, prefix) {
                log::debug!(
                    "overwriting declaration of prefix {:?} with {:?}",
                    prefix,
                    namespace
                );
            }
            set_binding(own, prefix, namespace);
            scope.bind(prefix, namespace);
            return prefix.to_string();
        }
        // the prefix is bound to something else further up
        self.prefix_for(namespace, own, scope)
    }

    fn attribute_prefix(&mut self, name: &QName, own: &mut Bindings, scope: &mut Scope) -> String {
        let (namespace, prefix) = (name.namespace_uri(), name.prefix());
        if namespace.is_empty() {
            return prefix.to_string();
        }
        if namespace == XML_NAMESPACE {
            return "xml".to_string();
        }
        if !prefix.is_empty() {
            if scope.namespace_by_prefix(prefix) == namespace {
                return prefix.to_string();
            }
            if !scope.is_bound(prefix) {
                set_binding(own, prefix, namespace);
                scope.bind(prefix, namespace);
                return prefix.to_string();
            }
        }
        self.prefix_for(namespace, own, scope)
    }

    // reuse a prefix that is bound to the namespace, or make one up
    fn prefix_for(&mut self, namespace: &str, own: &mut Bindings, scope: &mut Scope) -> String {
        if let Some(prefix) = scope.prefix_by_namespace(namespace) {
            return prefix.to_string();
        }
        let prefix = self.synthesize_prefix(scope);
        log::debug!("synthesized prefix {:?} for {:?}", prefix, namespace);
        set_binding(own, &prefix, namespace);
        scope.bind(&prefix, namespace);
        prefix
    }
}

fn has_binding(bindings: &Bindings, prefix: &str) -> bool {
    bindings.iter().any(|(p, _)| p == prefix)
}

fn set_binding(bindings: &mut Bindings, prefix: &str, namespace: &str) {
    match bindings.iter_mut().find(|(p, _)| p == prefix) {
        Some(binding) => binding.1 = namespace.to_string(),
        None => bindings.push((prefix.to_string(), namespace.to_string())),
    }
}

/// The in-scope bindings of an element, innermost first, as seen by
/// walking up the tree. An empty namespace means the prefix was
/// undeclared.
pub(crate) fn declared_bindings(dom: &Dom, node: Node) -> Vec<(String, String)> {
    let mut bindings = Vec::new();
    for ancestor in dom.ancestors(node) {
        if !dom.is_element(ancestor) {
            break;
        }
        for attribute in dom.attributes(ancestor) {
            if let Some(a) = dom.attribute(attribute) {
                if let Some(prefix) = a.name.declared_prefix() {
                    bindings.push((prefix.to_string(), a.value().to_string()));
                }
            }
        }
    }
    bindings
}
