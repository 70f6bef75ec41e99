//! Built-in cleanup table shipped with the tool.
//!
//! Every entry is merged with the root project's own table; see
//! [`crate::cleanup::resolver::ConfigResolver`].

/// A static cleanup table: package name → paths relative to the package root.
pub type DefaultTable = &'static [(&'static str, &'static [&'static str])];

/// Packages whose test suites, docs and demos are never needed at runtime.
pub const DEFAULT_CLEANUP: DefaultTable = &[
    ("behat/mink", &["tests", "driver-testsuite"]),
    ("behat/mink-browserkit-driver", &["tests"]),
    ("behat/mink-goutte-driver", &["tests"]),
    ("behat/mink-selenium2-driver", &["tests"]),
    ("brumann/polyfill-unserialize", &["tests"]),
    ("composer/composer", &["bin"]),
    (
        "drupal/coder",
        &[
            "coder_sniffer/Drupal/Test",
            "coder_sniffer/DrupalPractice/Test",
        ],
    ),
    ("doctrine/cache", &["tests"]),
    ("doctrine/collections", &["tests"]),
    ("doctrine/common", &["tests"]),
    ("doctrine/inflector", &["tests"]),
    ("doctrine/instantiator", &["tests"]),
    ("easyrdf/easyrdf", &["scripts"]),
    ("egulias/email-validator", &["documentation", "tests"]),
    ("fabpot/goutte", &["Goutte/Tests"]),
    ("guzzlehttp/promises", &["tests"]),
    ("guzzlehttp/psr7", &["tests"]),
    ("instaclick/php-webdriver", &["doc", "test"]),
    ("jcalderonzumba/gastonjs", &["docs", "examples", "tests"]),
    ("jcalderonzumba/mink-phantomjs-driver", &["tests"]),
    ("justinrainbow/json-schema", &["demo"]),
    ("masterminds/html5", &["bin", "test"]),
    ("mikey179/vfsStream", &["src/test"]),
    ("myclabs/deep-copy", &["doc"]),
    ("paragonie/random_compat", &["tests"]),
    ("pear/archive_tar", &["docs", "tests"]),
    ("pear/console_getopt", &["tests"]),
    ("pear/pear-core-minimal", &["tests"]),
    ("pear/pear_exception", &["tests"]),
    ("phar-io/manifest", &["examples", "tests"]),
    ("phar-io/version", &["tests"]),
    ("phpdocumentor/reflection-docblock", &["tests"]),
    ("phpspec/prophecy", &["fixtures", "spec", "tests"]),
    ("phpunit/php-code-coverage", &["tests"]),
    ("phpunit/php-timer", &["tests"]),
    ("phpunit/php-token-stream", &["tests"]),
    ("phpunit/phpunit", &["tests"]),
    ("phpunit/phpunit-mock-objects", &["tests"]),
    ("sebastian/code-unit-reverse-lookup", &["tests"]),
    ("sebastian/comparator", &["tests"]),
    ("sebastian/diff", &["tests"]),
    ("sebastian/environment", &["tests"]),
    ("sebastian/exporter", &["tests"]),
    ("sebastian/global-state", &["tests"]),
    ("sebastian/object-enumerator", &["tests"]),
    ("sebastian/object-reflector", &["tests"]),
    ("sebastian/recursion-context", &["tests"]),
    ("seld/jsonlint", &["tests"]),
    ("squizlabs/php_codesniffer", &["tests"]),
    ("stack/builder", &["tests"]),
    ("symfony/browser-kit", &["Tests"]),
    ("symfony/class-loader", &["Tests"]),
    ("symfony/console", &["Tests"]),
    ("symfony/css-selector", &["Tests"]),
    ("symfony/debug", &["Tests"]),
    ("symfony/dependency-injection", &["Tests"]),
    ("symfony/dom-crawler", &["Tests"]),
    ("symfony/filesystem", &["Tests"]),
    ("symfony/finder", &["Tests"]),
    ("symfony/event-dispatcher", &["Tests"]),
    ("symfony/http-foundation", &["Tests"]),
    ("symfony/http-kernel", &["Tests"]),
    ("symfony/phpunit-bridge", &["Tests"]),
    ("symfony/process", &["Tests"]),
    ("symfony/psr-http-message-bridge", &["Tests"]),
    ("symfony/routing", &["Tests"]),
    ("symfony/serializer", &["Tests"]),
    ("symfony/translation", &["Tests"]),
    ("symfony/validator", &["Tests", "Resources"]),
    ("symfony/yaml", &["Tests"]),
    ("symfony-cmf/routing", &["Test", "Tests"]),
    ("theseer/tokenizer", &["tests"]),
    ("twig/twig", &["doc", "ext", "test"]),
    ("zendframework/zend-escaper", &["doc"]),
    ("zendframework/zend-feed", &["doc"]),
    ("zendframework/zend-stdlib", &["doc"]),
];
