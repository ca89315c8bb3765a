use http::Request;

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    lookup: &'static str,
    request: TestRequest,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, lookup: &'static str, request: TestRequest) -> Self {
        Self { name, group, lookup, request }
    }

    pub fn hit(name: &'static str, lookup: &'static str, request: TestRequest) -> Self {
        Self::new(name, TestGroup::Hit, lookup, request)
    }

    pub fn miss(name: &'static str, lookup: &'static str, request: TestRequest) -> Self {
        Self::new(name, TestGroup::Miss, lookup, request)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    /// The `kind:field` token lookup the resolver is configured with.
    pub fn lookup(&self) -> &'static str {
        self.lookup
    }

    pub fn request(&self) -> &TestRequest {
        &self.request
    }
}

/// A request template, rebuilt for every iteration since resolving mutates it.
#[derive(Debug, Copy, Clone)]
pub struct TestRequest {
    method: &'static str,
    uri: &'static str,
    header: Option<(&'static str, &'static str)>,
}

impl TestRequest {
    pub const fn new(method: &'static str, uri: &'static str) -> Self {
        Self { method, uri, header: None }
    }

    pub const fn with_header(self, name: &'static str, value: &'static str) -> Self {
        Self { header: Some((name, value)), ..self }
    }

    pub fn build(&self) -> Request<()> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some((name, value)) = self.header {
            builder = builder.header(name, value);
        }
        builder.body(()).expect("test request should be valid")
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Hit,
    Miss,
}
