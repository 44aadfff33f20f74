use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Minimal element tree: the vendor schema uses neither attributes nor
/// mixed content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn leaf(name: &str, text: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str()).filter(|t| !t.is_empty())
    }

    /// Replace the first child called `child.name`, or append it.
    pub fn set(&mut self, child: Node) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    pub fn parse(xml: &str) -> Result<Node, String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut stack: Vec<Node> = Vec::new();
        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(start) => stack.push(Node::new(&String::from_utf8_lossy(start.name().as_ref()))),
                Event::Empty(start) => {
                    let node = Node::new(&String::from_utf8_lossy(start.name().as_ref()));
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| e.to_string())?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or("unbalanced closing tag")?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(node),
                    }
                }
                Event::Eof => return Err("document has no root element".to_string()),
                _ => {}
            }
        }
    }

    pub fn render(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        write_node(&mut writer, self);
        format!(
            "<?xml version=\"1.0\"?>\n{}\n",
            String::from_utf8_lossy(&writer.into_inner())
        )
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) {
    // writing into a Vec cannot fail
    if node.text.is_empty() && node.children.is_empty() {
        let _ = writer.write_event(Event::Empty(BytesStart::new(node.name.as_str())));
        return;
    }
    let _ = writer.write_event(Event::Start(BytesStart::new(node.name.as_str())));
    if !node.text.is_empty() {
        let _ = writer.write_event(Event::Text(BytesText::new(&node.text)));
    }
    for child in &node.children {
        write_node(writer, child);
    }
    let _ = writer.write_event(Event::End(BytesEnd::new(node.name.as_str())));
}
