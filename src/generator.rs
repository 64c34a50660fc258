use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::api::models::GenerationResult;
use crate::error::Error;

/// Backend seam for `/api/generate`: either the canned local payload or the
/// real model behind the gateway client.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, Error>;
}

/// Serves a fixed result after an artificial delay, standing in for the
/// upstream model during local development.
pub struct MockGenerator {
    delay: Duration,
}

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, Error> {
        // Models real upstream latency.
        sleep(self.delay).await;

        Ok(GenerationResult {
            suggested_components: ["Button", "TextInput", "Card", "Container"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            code_snippet: mock_snippet(prompt),
        })
    }
}

fn mock_snippet(prompt: &str) -> String {
    format!(
        r#"import React from 'react';
import {{ Button, TextInput, Card, Container }} from '@visa/nova-react';

const GeneratedComponent = () => {{
  return (
    <Container className="p-6">
      <Card className="max-w-md mx-auto">
        <div className="p-6">
          <h2 className="text-2xl font-bold text-gray-900 mb-4">
            Generated UI for: "{prompt}"
          </h2>
          <div className="space-y-4">
            <TextInput
              label="Example Input"
              placeholder="Enter some text..."
              className="w-full"
            />
            <Button
              variant="primary"
              className="w-full"
              onClick={{() => console.log('Button clicked!')}}
            >
              Submit
            </Button>
          </div>
        </div>
      </Card>
    </Container>
  );
}};

export default GeneratedComponent;"#
    )
}
