use crate::features::FEATURE_COUNT;

/// Model intercept, in bytes
pub const INTERCEPT: f64 = -42_380.5;

/// Linear regression weights, in [`crate::features::FEATURE_NAMES`] order
///
/// Fitted offline against crawled page loads with and without blocking;
/// regenerate both tables together when the vocabulary changes.
pub const COEFFICIENTS: [f64; FEATURE_COUNT] = [
    // adblockRequests
    18_415.2,
    // metrics.firstContentfulPaint, firstMeaningfulPaint, observedLoad (per ms)
    2.134,
    3.861,
    5.472,
    // document
    -1_204.7,
    0.0412,
    // font
    312.9,
    0.0087,
    // image
    148.3,
    0.0634,
    // media
    95.1,
    0.0118,
    // script
    2_245.6,
    0.1987,
    // stylesheet
    402.4,
    0.0529,
    // xhr
    1_118.0,
    0.0743,
    // other
    261.8,
    0.0305,
    // third-party requestCount, size
    3_872.9,
    0.2214,
    // total requestCount, size
    -512.3,
    0.0156,
    // thirdParties.<entity>.blocked
    61_204.0,  // Google Analytics
    148_930.7, // Google/Doubleclick Ads
    52_118.3,  // Google Tag Manager
    97_450.2,  // Facebook
    71_336.9,  // Twitter
    118_762.4, // Amazon Ads
    104_583.1, // Criteo
    126_947.5, // AppNexus
    112_305.8, // Rubicon Project
    98_774.6,  // PubMatic
    173_482.0, // Taboola
    159_361.3, // Outbrain
    45_920.7,  // Hotjar
    58_237.4,  // Yandex Metrica
    23_816.9,  // Scorecard Research
    31_045.2,  // Quantcast
];
